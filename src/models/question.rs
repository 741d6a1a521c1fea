use serde::{Deserialize, Serialize};

pub type QuestionId = i64;
pub type SubQuestionId = i64;
pub type ImageId = i64;

/// 题目
///
/// 由服务端持有，客户端只保存最近一次拉取的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub is_audited: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub sub_questions: Vec<SubQuestion>,
}

impl Question {
    /// 按 ID 查找小题
    pub fn sub_question(&self, sub_question_id: SubQuestionId) -> Option<&SubQuestion> {
        self.sub_questions.iter().find(|s| s.id == sub_question_id)
    }

    /// 列表中显示的小题数量文本
    pub fn sub_question_summary(&self) -> String {
        match self.sub_questions.len() {
            1 => "1 sub-question".to_string(),
            n => format!("{} sub-questions", n),
        }
    }
}

/// 小题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub id: SubQuestionId,
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub concept: ConceptType,
    #[serde(default)]
    pub process: ProcessType,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub image_id: Option<ImageId>,
}

/// 知识概念分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConceptType {
    /// 数与运算
    #[default]
    OperationsOnNumbers,
    /// 数学关系
    MathematicalRelationships,
    /// 空间性质与表示
    SpatialPropertiesAndRepresentations,
    /// 位置与导航
    LocationAndNavigation,
    /// 测量
    Measurement,
    /// 统计与数据
    StatisticsAndData,
    /// 概率
    ElementsOfChance,
}

impl ConceptType {
    pub const ALL: [ConceptType; 7] = [
        ConceptType::OperationsOnNumbers,
        ConceptType::MathematicalRelationships,
        ConceptType::SpatialPropertiesAndRepresentations,
        ConceptType::LocationAndNavigation,
        ConceptType::Measurement,
        ConceptType::StatisticsAndData,
        ConceptType::ElementsOfChance,
    ];

    /// 下拉框中显示的名称
    pub fn name(self) -> &'static str {
        match self {
            ConceptType::OperationsOnNumbers => "OPERATIONS_ON_NUMBERS",
            ConceptType::MathematicalRelationships => "MATHEMATICAL_RELATIONSHIPS",
            ConceptType::SpatialPropertiesAndRepresentations => {
                "SPATIAL_PROPERTIES_AND_REPRESENTATIONS"
            }
            ConceptType::LocationAndNavigation => "LOCATION_AND_NAVIGATION",
            ConceptType::Measurement => "MEASUREMENT",
            ConceptType::StatisticsAndData => "STATISTICS_AND_DATA",
            ConceptType::ElementsOfChance => "ELEMENTS_OF_CHANCE",
        }
    }

    fn position(self) -> usize {
        match self {
            ConceptType::OperationsOnNumbers => 0,
            ConceptType::MathematicalRelationships => 1,
            ConceptType::SpatialPropertiesAndRepresentations => 2,
            ConceptType::LocationAndNavigation => 3,
            ConceptType::Measurement => 4,
            ConceptType::StatisticsAndData => 5,
            ConceptType::ElementsOfChance => 6,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// 解题过程分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessType {
    /// 建模
    #[default]
    Formulate,
    /// 应用
    Apply,
    /// 解释
    Explain,
}

impl ProcessType {
    pub const ALL: [ProcessType; 3] = [ProcessType::Formulate, ProcessType::Apply, ProcessType::Explain];

    pub fn name(self) -> &'static str {
        match self {
            ProcessType::Formulate => "FORMULATE",
            ProcessType::Apply => "APPLY",
            ProcessType::Explain => "EXPLAIN",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ProcessType::Formulate => ProcessType::Apply,
            ProcessType::Apply => ProcessType::Explain,
            ProcessType::Explain => ProcessType::Formulate,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ProcessType::Formulate => ProcessType::Explain,
            ProcessType::Apply => ProcessType::Formulate,
            ProcessType::Explain => ProcessType::Apply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_deserializes_with_missing_fields() {
        let json = r#"{
            "id": 3,
            "source": "2024 mock",
            "sub_questions": [
                {"id": 11, "description": "d", "answer": "a", "concept": "MEASUREMENT", "process": "APPLY"}
            ]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.name, "");
        assert!(!question.is_audited);
        let sub = question.sub_question(11).unwrap();
        assert_eq!(sub.concept, ConceptType::Measurement);
        assert_eq!(sub.process, ProcessType::Apply);
        assert_eq!(sub.options, None);
        assert_eq!(sub.image_id, None);
    }

    #[test]
    fn enum_cycling_wraps_around() {
        for concept in ConceptType::ALL {
            assert_eq!(concept.next().prev(), concept);
        }
        assert_eq!(ConceptType::ElementsOfChance.next(), ConceptType::OperationsOnNumbers);
        assert_eq!(ProcessType::Formulate.prev(), ProcessType::Explain);
        assert_eq!(
            serde_json::to_string(&ConceptType::StatisticsAndData).unwrap(),
            format!("\"{}\"", ConceptType::StatisticsAndData.name())
        );
    }
}
