//! sqlauth: a username/password check backed by SQLite, plus the
//! command-execution helper it runs on.
//!
//! ```no_run
//! use sqlauth::auth::{SqlUserInfo, UserInfo};
//! use sqlauth::config::Settings;
//! use sqlauth::db::{self, SqlHelper};
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = Settings::load()?;
//! let helper = SqlHelper::from_settings(&settings);
//! db::init_db(&helper)?;
//!
//! let users = SqlUserInfo::new(helper);
//! if users.is_login_success("alice", "secret")? {
//!     println!("welcome back");
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod db;
