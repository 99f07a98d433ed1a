/* 📖 # What is the Platform Abstraction Layer?

The PAL is the only place that touches the filesystem or opens sockets.
The engine reads its config, seed data and image assets through it and hands
its API service to it for serving:
- RealPal: std::fs below a base directory, tiny_http for HTTP
- MockPal: in-memory files and an in-process request dispatcher for tests

Engine code depends on the Pal trait, never on a concrete implementation.
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle, ReadSeek};
