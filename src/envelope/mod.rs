//! 请求/响应信封：构造 generateContent 请求体，并从不可信响应中提取答案文本。
//!
//! Request and response envelopes for the Gemini `generateContent` call.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Prompt`] | Instruction preamble joined with user text |
//! | [`RequestEnvelope`] | `{ contents: [ { parts: [ { text } ] } ] }` request body |
//! | [`ResponseExtractor`] | Two-tier answer extraction from a raw response body |

mod prompt;
mod request;
mod response;

pub use prompt::{Prompt, CLASSIFICATION_PREAMBLE, GENERATION_PREAMBLE, GREETING_INSTRUCTION};
pub use request::{Content, Part, RequestEnvelope};
pub use response::{ExtractionSource, ResponseExtractor, TRAILING_MARKERS};
