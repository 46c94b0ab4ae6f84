//! EVA wire protocol.
//!
//! EVA exposes its catalog as POST-only RPC "messages" under a single base URL. This
//! module holds everything that knows about that protocol: endpoint and header
//! construction, request bodies, and response models.

pub mod body;
pub mod endpoint;
pub mod models;

pub use body::{PageConfig, ProductDetailBody, ProductFilterBody, SearchProductsBody};
pub use endpoint::{
    CONTENT_TYPE_HEADER, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, EndpointResolver, EvaEndpoint,
    HeaderContext, HeaderMap, ORGANIZATION_HEADER, ResourceKind, USER_AGENT_HEADER, build_headers,
};
pub use models::{EvaDetailResponse, EvaImage, EvaProduct, EvaSearchResponse};
