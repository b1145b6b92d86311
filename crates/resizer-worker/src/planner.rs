//! Variant planning: which outputs a request produces and where they are stored.

use std::collections::HashMap;

use resizer_core::constants::DEFAULT_FORMAT;
use resizer_core::{FallbackVariant, ResizeRequest, Size, SizeParseError, VariantSpec};
use resizer_storage::{validate_key, StorageError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("sizes[{index}]: {source}")]
    InvalidSize {
        index: usize,
        #[source]
        source: SizeParseError,
    },

    #[error("key: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("storage key {key:?} is planned for both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

/// Join path segments with `/`, skipping empty ones. The result never
/// starts or ends with a separator.
pub fn join(prefix: &str, name: &str) -> String {
    [prefix, name]
        .iter()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `{prefix}/{base}_{W}x{H}.{format}`, or `{prefix}/{base}.{format}` without a size.
pub fn storage_key(prefix: &str, base: &str, size: Option<Size>, format: &str) -> String {
    let name = match size {
        Some(size) => format!("{}_{}.{}", base, size, format),
        None => format!("{}.{}", base, format),
    };
    join(prefix, &name)
}

/// Derive the ordered variant list of a request: the fallback variant when
/// configured, the original-size variant when requested, then one variant per
/// requested size. Pure: the same request always yields the same specs.
pub fn plan(
    request: &ResizeRequest,
    fallback: Option<&FallbackVariant>,
) -> Result<Vec<VariantSpec>, PlanError> {
    if request.key.trim().is_empty() {
        return Err(PlanError::EmptyKey);
    }

    let sizes = request
        .sizes
        .iter()
        .enumerate()
        .map(|(index, input)| {
            input
                .resolve()
                .map_err(|source| PlanError::InvalidSize { index, source })
        })
        .collect::<Result<Vec<Size>, PlanError>>()?;

    let spec = |size: Option<Size>, format: &str, fallback: bool| VariantSpec {
        target_size: size,
        target_format: format.to_string(),
        storage_key: storage_key(&request.prefix, &request.key, size, format),
        fallback,
    };

    let mut specs = Vec::with_capacity(sizes.len() + 2);
    if let Some(fallback) = fallback {
        specs.push(spec(fallback.size, &fallback.format, true));
    }
    if request.save_original {
        specs.push(spec(None, DEFAULT_FORMAT, false));
    }
    specs.extend(
        sizes
            .into_iter()
            .map(|size| spec(Some(size), DEFAULT_FORMAT, false)),
    );

    check_valid_keys(&specs)?;
    check_unique_keys(&specs)?;
    Ok(specs)
}

/// Apply the blob store key rules up front, so a key no backend accepts is
/// a request error rather than a failure of every variant.
fn check_valid_keys(specs: &[VariantSpec]) -> Result<(), PlanError> {
    for spec in specs {
        if let Err(e) = validate_key(&spec.storage_key) {
            let reason = match e {
                StorageError::InvalidKey(reason) => reason,
                other => other.to_string(),
            };
            return Err(PlanError::InvalidKey {
                key: spec.storage_key.clone(),
                reason,
            });
        }
    }
    Ok(())
}

fn check_unique_keys(specs: &[VariantSpec]) -> Result<(), PlanError> {
    let mut seen: HashMap<&str, String> = HashMap::with_capacity(specs.len());
    for spec in specs {
        if let Some(first) = seen.insert(spec.storage_key.as_str(), spec.label()) {
            return Err(PlanError::DuplicateKey {
                key: spec.storage_key.clone(),
                first,
                second: spec.label(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resizer_core::SizeInput;

    fn request(sizes: Vec<SizeInput>) -> ResizeRequest {
        ResizeRequest {
            url: "https://example.com/a.jpg".to_string(),
            sizes,
            key: "a".to_string(),
            prefix: "products/42".to_string(),
            save_original: true,
        }
    }

    fn size(width: u32, height: u32) -> SizeInput {
        SizeInput::Dimensions { width, height }
    }

    fn keys(specs: &[VariantSpec]) -> Vec<&str> {
        specs.iter().map(|s| s.storage_key.as_str()).collect()
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", ""), "");
        assert_eq!(join("", "a.webp"), "a.webp");
        assert_eq!(join("p", ""), "p");
        assert_eq!(join("p/q", "a.webp"), "p/q/a.webp");
        assert_eq!(join("/p/", "a.webp"), "p/a.webp");
    }

    #[test]
    fn test_storage_key() {
        let s = Size::new(640, 480).unwrap();
        assert_eq!(storage_key("", "a", Some(s), "webp"), "a_640x480.webp");
        assert_eq!(storage_key("img", "a", None, "jpeg"), "img/a.jpeg");
    }

    #[test]
    fn test_plan_order() {
        let fallback = FallbackVariant {
            format: "jpeg".to_string(),
            size: Some(Size::new(1200, 1200).unwrap()),
        };
        let specs = plan(
            &request(vec![size(640, 480), SizeInput::Text("320x240".to_string())]),
            Some(&fallback),
        )
        .unwrap();

        assert_eq!(
            keys(&specs),
            vec![
                "products/42/a_1200x1200.jpeg",
                "products/42/a.webp",
                "products/42/a_640x480.webp",
                "products/42/a_320x240.webp",
            ]
        );
        assert_eq!(specs[0].target_format, "jpeg");
        assert!(specs[0].fallback);
        assert_eq!(specs[0].label(), "fallback");
        assert_eq!(specs[1].target_size, None);
        assert_eq!(specs[1].label(), "original");
        assert!(specs[2..].iter().all(|s| s.target_format == "webp"));
    }

    #[test]
    fn test_plan_without_original_or_fallback() {
        let mut req = request(vec![size(100, 100)]);
        req.save_original = false;
        req.prefix = String::new();

        let specs = plan(&req, None).unwrap();
        assert_eq!(keys(&specs), vec!["a_100x100.webp"]);
    }

    #[test]
    fn test_fallback_without_size_uses_source_size() {
        let mut req = request(vec![]);
        req.save_original = false;
        let fallback = FallbackVariant {
            format: "png".to_string(),
            size: None,
        };

        let specs = plan(&req, Some(&fallback)).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].target_size, None);
        assert_eq!(specs[0].storage_key, "products/42/a.png");
        assert_eq!(specs[0].label(), "fallback");
    }

    #[test]
    fn test_sizeless_fallback_and_original_have_distinct_labels() {
        let fallback = FallbackVariant {
            format: "png".to_string(),
            size: None,
        };
        let specs = plan(&request(vec![]), Some(&fallback)).unwrap();
        let labels: Vec<String> = specs.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["fallback", "original"]);
    }

    #[test]
    fn test_parent_segment_in_key_is_rejected() {
        let mut req = request(vec![size(50, 50)]);
        req.key = "../secret".to_string();
        req.prefix = String::new();

        let err = plan(&req, None).unwrap_err();
        assert!(matches!(
            &err,
            PlanError::InvalidKey { key, .. } if key == "../secret.webp"
        ));
        assert!(err.to_string().starts_with("key: "));

        let mut req = request(vec![]);
        req.prefix = "a/../../b".to_string();
        assert!(matches!(plan(&req, None), Err(PlanError::InvalidKey { .. })));
    }

    #[test]
    fn test_dots_inside_key_are_allowed() {
        let mut req = request(vec![size(50, 50)]);
        req.key = "summer..2024".to_string();

        let specs = plan(&req, None).unwrap();
        assert_eq!(
            keys(&specs),
            vec![
                "products/42/summer..2024.webp",
                "products/42/summer..2024_50x50.webp"
            ]
        );
    }

    #[test]
    fn test_plan_is_idempotent() {
        let req = request(vec![size(640, 480), size(320, 240)]);
        let fallback = FallbackVariant {
            format: "jpeg".to_string(),
            size: None,
        };
        assert_eq!(plan(&req, Some(&fallback)), plan(&req, Some(&fallback)));
    }

    #[test]
    fn test_malformed_size_fails_before_anything_is_planned() {
        let err = plan(
            &request(vec![size(640, 480), SizeInput::Text("640-480".to_string())]),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidSize {
                index: 1,
                source: SizeParseError::Malformed(_)
            }
        ));
        assert!(err.to_string().starts_with("sizes[1]: "));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let err = plan(&request(vec![size(0, 480)]), None).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSize { index: 0, .. }));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let err = plan(&request(vec![size(640, 480), size(640, 480)]), None).unwrap_err();
        assert_eq!(
            err,
            PlanError::DuplicateKey {
                key: "products/42/a_640x480.webp".to_string(),
                first: "640x480".to_string(),
                second: "640x480".to_string(),
            }
        );
    }

    #[test]
    fn test_webp_fallback_collides_with_original() {
        let fallback = FallbackVariant {
            format: "webp".to_string(),
            size: None,
        };
        let err = plan(&request(vec![]), Some(&fallback)).unwrap_err();
        assert!(matches!(err, PlanError::DuplicateKey { .. }));
    }

    #[test]
    fn test_empty_key() {
        let mut req = request(vec![]);
        req.key = "  ".to_string();
        assert_eq!(plan(&req, None), Err(PlanError::EmptyKey));
    }
}
