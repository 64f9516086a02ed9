pub mod envelope;
pub mod pipeline;

pub use envelope::{Envelope, Payload, Source};
pub use pipeline::{Adapter, Handler, Pipeline, RequestContext};
