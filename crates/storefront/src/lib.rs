//! QuickCart storefront client library.
//!
//! Everything between the core cart/catalog state and a display surface:
//! configuration, the remote API gateway, the durable token store, the
//! session, checkout, display views and the [`Storefront`] controller that
//! owns it all.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickcart_storefront::{FileTokenStore, HttpGateway, Storefront, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let gateway = HttpGateway::new(&config)?;
//! let store = Box::new(FileTokenStore::new(config.token_path.clone()));
//! let mut storefront = Storefront::new(config, gateway, my_frontend, store);
//! storefront.start().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod frontend;
pub mod gateway;
pub mod session;
pub mod storage;
pub mod storefront;
pub mod view;

pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutState};
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use frontend::{Frontend, RecordingFrontend};
pub use gateway::{Gateway, GatewayError, HttpGateway};
pub use session::{Session, SessionError};
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};
pub use storefront::Storefront;
