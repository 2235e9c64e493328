use crate::decoder::ReviewDecoder;
use crate::dispatcher::Dispatcher;
use crate::encoder::ResponseEncoder;

/// Everything the handlers share. Nothing in here changes after startup.
pub(crate) struct ApiServerState {
    pub(crate) decoder: ReviewDecoder,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) encoder: ResponseEncoder,
}
