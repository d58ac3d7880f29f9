//! Authentication: password hashing, session tokens, register and login.

mod handlers;
mod password;
mod service;
mod token;
mod types;

pub use handlers::{login, register, LoginResponse};
pub use password::{PasswordAlgorithm, PasswordHasher, DEFAULT_BCRYPT_COST};
pub use service::AuthService;
pub use token::{Claims, TokenIssuer, DEFAULT_TOKEN_TTL_HOURS};
pub use types::{LoginIdentifier, LoginRequest, RegisterRequest};
