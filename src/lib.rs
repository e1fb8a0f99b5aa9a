//! donutbot: a console controller for a DonutSMP bot.
//!
//! The bot itself lives in a world-agent sidecar reached over TCP
//! ([`world::connect_agent`]). This crate drives it from a numbered menu,
//! queries the public statistics API, and runs one background automation at
//! a time (farming, mining, walking, spamming, live chat).
//!
//! ```no_run
//! use donutbot::api::ApiClient;
//! use donutbot::bridge::EventBridge;
//! use donutbot::config::load_config;
//! use donutbot::session::Session;
//! use donutbot::ui::Renderer;
//! use donutbot::world::connect_agent;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let bridge = EventBridge::new();
//! let conn = connect_agent(&config.world.agent_addr, &config.world.host, bridge.clone()).await?;
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! let mut session = Session::new(
//!     stdin,
//!     conn.world(),
//!     Arc::new(ApiClient::new(&config.api)),
//!     Arc::new(Renderer::new(true, true)),
//!     bridge,
//!     &config,
//! );
//! session.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod bridge;
pub mod build_info;
pub mod config;
pub mod error;
pub mod quantity;
pub mod session;
pub mod supervisor;
pub mod tasks;
#[cfg(test)]
pub mod testsupport;
pub mod ui;
pub mod world;
