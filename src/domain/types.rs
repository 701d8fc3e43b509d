// ==========================================
// 大学成果分析看板 - 领域类型定义
// ==========================================
// 枚举的数据库/上传文件取值即为韩文原文（上传模板契约）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 记录类型 (Record Type)
// ==========================================
// 序列化格式: snake_case (与 upload_history.data_type 一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    DepartmentKpi,
    Publication,
    ResearchBudget,
    Student,
}

impl RecordType {
    /// 注册顺序（文件识别平局时先注册者优先）
    pub const ALL: [RecordType; 4] = [
        RecordType::DepartmentKpi,
        RecordType::Publication,
        RecordType::ResearchBudget,
        RecordType::Student,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordType::DepartmentKpi => "department_kpi",
            RecordType::Publication => "publication",
            RecordType::ResearchBudget => "research_budget",
            RecordType::Student => "student",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "department_kpi" => Some(RecordType::DepartmentKpi),
            "publication" => Some(RecordType::Publication),
            "research_budget" => Some(RecordType::ResearchBudget),
            "student" => Some(RecordType::Student),
            _ => None,
        }
    }

    /// 显示名称（韩文，面向上传页面）
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordType::DepartmentKpi => "학과별 KPI",
            RecordType::Publication => "논문",
            RecordType::ResearchBudget => "연구비 집행 내역",
            RecordType::Student => "학생",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 上传状态 (Upload Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Success,
    Failed,
}

impl UploadStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            UploadStatus::Success => "success",
            UploadStatus::Failed => "failed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "success" => Some(UploadStatus::Success),
            "failed" => Some(UploadStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 枚举型字段
// ==========================================
// 每个枚举的 ALLOWED 即校验器使用的允许值集合（顺序即报错顺序）

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            pub fn to_db_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn from_db_str(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_db_str())
            }
        }
    };
}

text_enum!(
    /// 저널등급
    JournalGrade {
        Scie => "SCIE",
        Kci => "KCI",
        Scopus => "SCOPUS",
        KciCandidate => "KCI후보",
        Other => "기타",
        Ssci => "SSCI",
    }
);

text_enum!(
    /// 과제연계여부
    ProjectLinked {
        Yes => "Y",
        No => "N",
    }
);

text_enum!(
    /// 연구비 집행 상태
    ExecutionStatus {
        Completed => "집행완료",
        Processing => "처리중",
    }
);

text_enum!(
    /// 과정구분
    ProgramType {
        Bachelor => "학사",
        Master => "석사",
        Doctor => "박사",
    }
);

text_enum!(
    /// 학적상태
    EnrollmentStatus {
        Enrolled => "재학",
        OnLeave => "휴학",
        Graduated => "졸업",
    }
);

text_enum!(
    /// 성별
    Gender {
        Male => "남",
        Female => "여",
    }
);
