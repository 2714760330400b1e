pub mod credentials;
pub mod gates;
pub mod vpc;

pub use credentials::check_credentials;
pub use gates::{allow_admin, api_authenticated, https_required};
pub use vpc::vpc_access_only;
