mod decode;
mod ids;
mod lesson;
mod markup;
mod module;
mod question;

pub use decode::{DecodeError, decode_modules};
pub use ids::{LessonId, ModuleId, ParseIdError, QuestionId};
pub use lesson::Lesson;
pub use markup::Markup;
pub use module::{Module, ModuleContent, ModuleTest};
pub use question::Question;
