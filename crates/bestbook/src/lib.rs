//! # Bestbook
//!
//! Client-side session lifecycle for the Bestbook storefront.
//!
//! The header is the one place that is always on screen, so it owns the
//! session check: while a [`HeaderView`] is mounted the stored session is
//! validated every poll interval, and an expired or revoked session is
//! signed out exactly once, however many things ask for it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bestbook::prelude::*;
//!
//! # async fn demo() -> Result<(), BestbookError> {
//! bestbook::telemetry::init();
//!
//! let app = BestbookBuilder::new()
//!     .base_url("http://localhost:3000")
//!     .build(|route: &str| println!("navigate to {route}"))?;
//!
//! let header = HeaderView::mount(&app);
//! println!("{}", header.render());
//! # Ok(())
//! # }
//! ```

mod app;
mod error;
pub mod telemetry;
mod view;

pub use app::{Bestbook, BestbookBuilder, DEFAULT_BASE_URL};
pub use error::BestbookError;
pub use view::{HeaderView, Presentation};

/// Re-exports for the common case.
pub mod prelude {
    pub use crate::{Bestbook, BestbookBuilder, BestbookError, HeaderView, Presentation};
    pub use bestbook_lifecycle::{
        HttpSignoutClient, LifecycleConfig, MonitorState, Navigator, SignoutClient,
        SignoutCoordinator, SignoutOutcome,
    };
    pub use bestbook_session::{MemorySessionStore, Profile, Session, SessionStore};
    pub use bestbook_tick::{TickConfig, TickScheduler};
    pub use bestbook_token::{Validity, validate};
}
