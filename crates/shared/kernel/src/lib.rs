//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it owns layered configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use vitrine_kernel::config::load_vitrine_config;
//!
//! let cfg = load_vitrine_config(Some("vitrine.toml")).unwrap();
//! assert!(cfg.cache.quota_bytes > 0);
//! ```

pub mod config;

pub use vitrine_domain as domain;
