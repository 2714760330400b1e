pub mod credentials;
pub mod cross_token;
pub mod factory;
pub mod identity;
pub mod resolver;
pub mod token_cache;
pub mod validator;

pub use credentials::Credentials;
pub use factory::build_resolver;
pub use identity::Identity;
pub use resolver::{CredentialResolver, Resolution};
pub use validator::{HttpTokenValidator, TokenValidator, ValidationError};
