//! 类型定义模块

mod metadata;
mod settings;
mod view;

pub use metadata::{AccessLevel, FieldTarget, MetadataMap};
pub use settings::WidgetSettings;
pub use view::{DeletePrompt, Notice, NoticeLevel, RowId, RowView, WidgetView};
