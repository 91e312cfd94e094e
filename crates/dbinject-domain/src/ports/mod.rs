//! Domain ports
//!
//! | Port | Description |
//! |------|-------------|
//! | [`OptionsFactory`] | Provider that supplies option values on demand |
//! | [`DatabaseClient`] | The wrapped client library's connect primitive |

mod database_client;
mod options_factory;

pub use database_client::DatabaseClient;
pub use options_factory::OptionsFactory;
