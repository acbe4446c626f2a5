// ==========================================
// 订单分组汇总系统 - 复合编码解析器
// ==========================================
// 职责: 货品商家编码字段 → 编码列表 + 数量
// 语法: 以 ';' 分段; 段内首个 '*' 分隔编码与数量;
//       数量非法时整段原文作为编码、数量为 1（不报错）
// ==========================================

use crate::domain::order::ParsedLine;
use crate::domain::reference::ReferenceData;

/// 解析复合编码字段
pub fn parse(field: &str) -> ParsedLine {
    let mut line = ParsedLine::default();

    for segment in field.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (code, qty) = match segment.split_once('*') {
            Some((code_part, qty_part)) => match qty_part.trim().parse::<u64>() {
                Ok(qty) => (code_part.trim().to_string(), qty),
                Err(_) => (segment.to_string(), 1),
            },
            None => (segment.to_string(), 1),
        };
        line.quantity_by_code.insert(code.clone(), qty);
        line.codes.push(code);
    }

    line
}

/// 编码分类结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// 已匹配且参与选择/聚合的编码（去重，保持首次出现顺序）
    pub matched: Vec<String>,
    /// 编码表中不存在的编码
    pub unmatched: Vec<String>,
    /// 已匹配但优先级为忽略优先级、被剔除的编码
    pub ignored: Vec<String>,
}

impl Resolution {
    /// 无任何编码命中编码表
    pub fn is_fully_unmatched(&self) -> bool {
        self.matched.is_empty() && self.ignored.is_empty()
    }

    /// 存在未匹配编码，但仍有编码命中
    pub fn is_partially_unmatched(&self) -> bool {
        !self.unmatched.is_empty() && !self.is_fully_unmatched()
    }

    /// 命中的编码全部被忽略
    pub fn is_only_ignored(&self) -> bool {
        self.matched.is_empty() && !self.ignored.is_empty()
    }
}

/// 按编码表对解析结果分类
pub fn classify(
    line: &ParsedLine,
    reference: &ReferenceData,
    ignored_priority: Option<i64>,
) -> Resolution {
    let mut resolution = Resolution::default();

    for code in line.distinct_codes() {
        match reference.entry(code) {
            None => resolution.unmatched.push(code.to_string()),
            Some(entry) if ignored_priority == Some(entry.priority) => {
                resolution.ignored.push(code.to_string())
            }
            Some(_) => resolution.matched.push(code.to_string()),
        }
    }

    resolution
}
