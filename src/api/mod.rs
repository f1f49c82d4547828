//! Endpoint facades.
//!
//! Each facade wraps an [`ApiClient`](crate::client::ApiClient) and exposes
//! one typed function per remote operation, in four shapes:
//!
//! | Shape | Returns |
//! |---|---|
//! | `op` | payload, cancellable async |
//! | `op_with_response` | [`ApiResponse`](crate::client::ApiResponse), cancellable async |
//! | `op_blocking` | payload, blocking |
//! | `op_with_response_blocking` | [`ApiResponse`](crate::client::ApiResponse), blocking |

mod mempool;
pub mod models;


pub use mempool::{MEMPOOL_LIST, MEMPOOL_TRANSACTION, MempoolApi};
pub use models::{
    MempoolListRequest, MempoolListResponse, MempoolTransactionHashes, MempoolTransactionPayload,
    MempoolTransactionRequest, MempoolTransactionResponse,
};
