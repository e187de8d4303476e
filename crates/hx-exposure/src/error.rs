use hx_core::HxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExposureError {
    #[error(transparent)]
    Config(#[from] HxError),

    #[error("link store sized for {store} links but the network has {network}")]
    StoreSize { store: usize, network: usize },
}

pub type ExposureResult<T> = Result<T, ExposureError>;
