//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File          | Invocation          | Description                        |
//! |---------------|---------------------|------------------------------------|
//! | `perform.rs`  | `backup perform`    | Run triggers in order              |
//! | `generate.rs` | `backup generate`   | Add a job stanza to the config     |
//! | `decrypt.rs`  | `backup decrypt`    | Decrypt a package with openssl/gpg |

pub mod decrypt;
pub mod generate;
pub mod perform;
