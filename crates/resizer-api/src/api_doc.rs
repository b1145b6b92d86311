use resizer_core::{Manifest, ManifestKey, ResizeRequest, SizeInput};
use utoipa::OpenApi;

use crate::error::ResponseBodyError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resizer API",
        version = "0.1.0",
        description = "Fetches a source image, resizes it to every requested size and stores the variants"
    ),
    paths(
        crate::handlers::resize::resize,
        crate::handlers::base64::to_base64,
        crate::handlers::metrics::metrics,
        crate::handlers::health::liveness_check,
    ),
    components(schemas(ResizeRequest, SizeInput, Manifest, ManifestKey, ResponseBodyError)),
    tags(
        (name = "resize", description = "Variant generation"),
        (name = "health", description = "Liveness and metrics")
    )
)]
pub struct ApiDoc;
