//! Runtime capture layer.
//!
//! In the live tool a host-specific adapter traps the SDK's global
//! bindings and forwards everything it sees into the typed hook entry
//! points on [`CaptureSession`]. Offline, the same hooks are driven by
//! replaying a recorded trace. Either way the contract is identical:
//! hooks are synchronous, prompt, and never let an error escape.

pub mod network;
pub mod session;
pub mod shape;

pub use network::{NetworkFacts, SdkAssetOrigin};
pub use session::CaptureSession;
