//! 扫码结果的后续操作：复制、URL 判断、确认后打开浏览器。

mod actions;
mod clipboard;
mod url;

pub use actions::{OpenOutcome, ResultActionDispatcher};
pub use clipboard::SystemClipboard;
pub use url::{SECURE_SCHEME, SchemeCheck, has_scheme, looks_like_url, with_secure_scheme};
