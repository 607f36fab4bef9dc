// rest/mod.rs - Uniform response envelope shared by every endpoint
//
// Every handler answers through a `Responder`, which produces one of three
// envelope shapes (data, plain message, error with detail) plus the paginated
// variant of the data shape. Error responses carry a generated correlation id
// in `error` so a generic client-facing failure can be joined to server logs.

pub mod detail;
pub mod multipart;
pub mod pagination;
pub mod response;

pub use detail::{Detail, ErrorDetails};
pub use multipart::multipart_form;
pub use pagination::{Pagination, PaginationParams, PaginationQuery, PaginationResult};
pub use response::{get_data, Envelope, IdGenerator, Reply, Responder, UuidGenerator};
