use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

/// Session wiring stamped onto admin requests.
///
/// Authorization policy itself is out of scope here; this layer is the
/// registration hook that downstream guards and handlers read from request
/// extensions.
#[derive(Clone, Debug)]
pub struct SessionLayerConfig {
    pub cookie: String,
    pub admin_prefix: String,
}

pub(crate) async fn admin_guard(
    State(config): State<SessionLayerConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(config);
    next.run(request).await
}
