/// 考试标签枚举（固定的考试序号集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamLabel {
    /// 第一次考试
    First = 1,
    /// 第二次考试
    Second = 2,
    /// 第三次考试
    Third = 3,
    /// 第四次考试
    Fourth = 4,
    /// 第五次考试
    Fifth = 5,
    /// 第六次考试
    Sixth = 6,
    /// 第七次考试
    Seventh = 7,
    /// 第八次考试
    Eighth = 8,
}

impl ExamLabel {
    /// 全部可选标签，按序号排列
    pub const ALL: [ExamLabel; 8] = [
        ExamLabel::First,
        ExamLabel::Second,
        ExamLabel::Third,
        ExamLabel::Fourth,
        ExamLabel::Fifth,
        ExamLabel::Sixth,
        ExamLabel::Seventh,
        ExamLabel::Eighth,
    ];

    /// 获取考试序号
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// 获取显示标签
    pub fn label(self) -> &'static str {
        match self {
            ExamLabel::First => "1er Examen",
            ExamLabel::Second => "2do Examen",
            ExamLabel::Third => "3er Examen",
            ExamLabel::Fourth => "4to Examen",
            ExamLabel::Fifth => "5to Examen",
            ExamLabel::Sixth => "6to Examen",
            ExamLabel::Seventh => "7mo Examen",
            ExamLabel::Eighth => "8vo Examen",
        }
    }

    /// 从序号解析
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|exam| exam.ordinal() == ordinal)
    }

    /// 从标签解析（忽略大小写和首尾空白）
    pub fn from_label(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|exam| exam.label().eq_ignore_ascii_case(wanted))
    }

    /// 先按标签匹配，再按序号匹配
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_label(s).or_else(|| s.trim().parse().ok().and_then(Self::from_ordinal))
    }
}

impl std::fmt::Display for ExamLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
