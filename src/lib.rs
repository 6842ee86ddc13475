//! # sentiment-client
//!
//! Client for the sentiment-analysis service: bearer-token HTTP client,
//! durable session store, auth session manager, and the terminal views
//! (login, register, dashboard) built on top of them.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` talks to the backend, `state` owns the session lifecycle, and
//! `pages` holds form validation plus rendering used by the `sentiment`
//! binary.

pub mod config;
pub mod net;
pub mod pages;
pub mod state;
