//! 课程数据导入
//!
//! 从教务系统导出的 JSON 文件解析学期与课程，合并后写入课程仓储。

pub mod loader;
pub mod parser;

pub use loader::{CourseImporter, ImportReport};
pub use parser::{merge_courses, parse_coursedetails, parse_pdf_list};
