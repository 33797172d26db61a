//! 课程与学期模型
//!
//! 字段与教务系统导出的 JSON 保持一致，缺失字段取默认值。

use serde::{Deserialize, Serialize};

/// 学期
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Semester {
    /// 学期代码，例如 1222 表示 Spring 2022
    pub code: u32,
    /// 学期名称
    pub name: String,
    pub cal_name: String,
    pub reg_name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Building {
    pub location_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Meeting {
    pub meeting_number: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub days: Vec<String>,
    pub building: Building,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Schedule {
    pub start_date: String,
    pub end_date: String,
    pub meetings: Vec<Meeting>,
}

/// 教学班
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ClassSection {
    pub class_number: String,
    pub section: String,
    pub status: String,
    pub pu_calc_status: String,
    pub seat_status: String,
    pub type_name: String,
    pub capacity: String,
    pub enrollment: String,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Instructor {
    pub emplid: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

/// 交叉列出的课程编号
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Crosslisting {
    pub subject: String,
    pub catalog_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Detail {
    pub start_date: String,
    pub end_date: String,
    pub track: String,
    pub description: String,
    pub seat_reservations: String,
}

/// P/D/F 选项
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Pdf {
    pub required: bool,
    pub permitted: bool,
}

/// 成绩构成
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GradingComponent {
    pub component: String,
    pub weight: f64,
}

/// 课程
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Course {
    pub guid: Option<String>,
    pub course_id: String,
    pub catalog_number: String,
    pub title: String,
    /// 所属学期代码
    pub semester: u32,
    pub department: String,

    pub description: Option<String>,
    pub detail: Option<Detail>,
    pub pdf: Pdf,
    pub audit: bool,
    pub grading: Vec<GradingComponent>,
    pub assignments: String,
    pub reserved_seats: Vec<String>,
    pub readings: Vec<String>,
    pub prerequisites: String,
    pub other_information: String,
    pub other_requirements: String,
    pub website: String,
    pub distribution: String,
    pub open: bool,
    pub new: bool,

    pub instructors: Vec<Instructor>,
    pub crosslistings: Vec<Crosslisting>,
    pub classes: Vec<ClassSection>,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            guid: None,
            course_id: String::new(),
            catalog_number: String::new(),
            title: String::new(),
            semester: 0,
            department: String::new(),
            description: None,
            detail: None,
            pdf: Pdf::default(),
            audit: false,
            grading: Vec::new(),
            assignments: String::new(),
            reserved_seats: Vec::new(),
            readings: Vec::new(),
            prerequisites: String::new(),
            other_information: String::new(),
            other_requirements: String::new(),
            website: String::new(),
            distribution: String::new(),
            open: true,
            new: false,
            instructors: Vec::new(),
            crosslistings: Vec::new(),
            classes: Vec::new(),
        }
    }
}

impl Course {
    /// 去重键：(course_id, semester)
    pub fn merge_key(&self) -> (String, u32) {
        (self.course_id.clone(), self.semester)
    }
}
