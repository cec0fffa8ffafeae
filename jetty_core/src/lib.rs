//!
//! Access to Jetty
//!
//! Provides the pieces shared by every Jetty connector: the connector
//! trait, the identity node model connectors produce, project and
//! credentials configuration, and logging.
#![deny(missing_docs)]

pub use connectors::Connector;
pub use jetty::fetch_credentials;

pub mod connectors;
pub mod jetty;
pub mod logging;

#[macro_export]
/// Time the code inside the macro. Write the elapsed time to debug logs.
/// Derived from https://notes.iveselov.info/programming/time_it-a-case-study-in-rust-macros
macro_rules! log_runtime {
    ($context:literal, $($tt:tt)+) => {
        {
            $crate::logging::debug!("{}: starting", $context);
            let timer = std::time::Instant::now();
            let x =
            $(
                $tt
            )+;
            $crate::logging::debug!("{}: {:?}", $context, timer.elapsed());
            x
        }
    }
}
