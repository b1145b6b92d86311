//! Manifest assembly from successful task outcomes.

use resizer_core::{Manifest, ManifestKey, SourceMetadata};

use crate::executor::TaskSuccess;

/// Build the manifest of a batch. Keys are sorted ascending by key string,
/// so the result does not depend on task completion order.
pub fn assemble(source: &SourceMetadata, successes: &[TaskSuccess]) -> Manifest {
    let mut keys: Vec<ManifestKey> = successes
        .iter()
        .map(|success| ManifestKey {
            width: success.width,
            height: success.height,
            key: success.key.clone(),
        })
        .collect();
    keys.sort_by(|a, b| a.key.cmp(&b.key));

    Manifest {
        format: source.format.clone(),
        content_type: source.content_type.clone(),
        width: source.width,
        height: source.height,
        keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceMetadata {
        SourceMetadata {
            width: 1000,
            height: 800,
            format: "jpeg".to_string(),
            content_type: "image/jpeg".to_string(),
        }
    }

    fn success(key: &str, width: u32, height: u32) -> TaskSuccess {
        TaskSuccess {
            label: format!("{}x{}", width, height),
            key: key.to_string(),
            width,
            height,
        }
    }

    #[test]
    fn test_copies_source_metadata() {
        let manifest = assemble(&source(), &[]);
        assert_eq!(manifest.format, "jpeg");
        assert_eq!(manifest.content_type, "image/jpeg");
        assert_eq!((manifest.width, manifest.height), (1000, 800));
        assert!(manifest.keys.is_empty());
    }

    #[test]
    fn test_single_key() {
        let manifest = assemble(&source(), &[success("a.webp", 1000, 800)]);
        assert_eq!(manifest.keys.len(), 1);
        assert_eq!(manifest.keys[0].key, "a.webp");
    }

    #[test]
    fn test_keys_sorted_regardless_of_input_order() {
        let successes = vec![
            success("p/a_640x480.webp", 640, 480),
            success("p/a.webp", 1000, 800),
            success("p/a_1200x1200.jpeg", 1000, 800),
            success("p/a_320x240.webp", 320, 240),
        ];

        let mut reversed = successes.clone();
        reversed.reverse();

        let manifest = assemble(&source(), &successes);
        let keys: Vec<&str> = manifest.keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "p/a.webp",
                "p/a_1200x1200.jpeg",
                "p/a_320x240.webp",
                "p/a_640x480.webp",
            ]
        );
        assert_eq!(manifest, assemble(&source(), &reversed));
    }
}
