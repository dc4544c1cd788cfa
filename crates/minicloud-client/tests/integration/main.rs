//! Integration tests for minicloud-client
//!
//! Uses wiremock to simulate the MiniCloud backend and verifies end-to-end
//! behavior of the request gateway, listing normalization, signed URLs and
//! uploads.

mod common;

mod test_gateway;
mod test_listing;
mod test_signing;
mod test_upload;
