use rpcprims_envelope::ConvertError;

/// Errors raised while applying a request to a registered procedure.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No procedure is registered under the requested name.
    #[error("unknown procedure '{0}'")]
    UnknownProcedure(String),

    /// The request carried a different number of arguments.
    #[error("procedure expects {expected} arguments, got {found}")]
    Arity { expected: usize, found: usize },

    /// An argument could not be converted to the declared parameter type.
    #[error("argument {index}: {source}")]
    Argument {
        index: usize,
        #[source]
        source: ConvertError,
    },

    /// The implementation panicked while handling the call.
    #[error("procedure panicked: {0}")]
    Panicked(String),
}

impl From<ConvertError> for DispatchError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Arity { expected, found } => DispatchError::Arity { expected, found },
            ConvertError::Slot { index, source } => DispatchError::Argument {
                index,
                source: *source,
            },
            other => DispatchError::Argument {
                index: 0,
                source: other,
            },
        }
    }
}

/// Errors that can occur while serving or making a remote call.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] rpcprims_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rpcprims_frame::FrameError),

    /// Envelope encode/decode error.
    #[error("codec error: {0}")]
    Codec(#[from] rpcprims_envelope::CodecError),

    /// Result slots did not match the declared return shape.
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Dispatch failed on the serving side.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl RpcError {
    /// True when the peer closed the connection before a full response.
    ///
    /// This is what a client observes when the server drops a request for
    /// an unknown procedure.
    pub fn is_connection_closed(&self) -> bool {
        matches!(
            self,
            RpcError::Frame(rpcprims_frame::FrameError::ConnectionClosed)
        )
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
