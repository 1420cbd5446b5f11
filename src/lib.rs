//! composer - phrase sequence editor
//!
//! カーソル付きフレーズ列と、それを操作する対話セッション

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;
pub mod options;

// データ層
pub mod sequence;

// 再生
pub mod playback;

// 対話層
pub mod session;

// 公開API
pub use error::{ComposerError, Result, SequenceError};
pub use sequence::{Node, NodeId, PhraseSequence};
pub use session::{Composer, MenuSession};
