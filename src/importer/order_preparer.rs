// ==========================================
// 订单分组汇总系统 - 订单表预处理
// ==========================================
// 职责: 订单表进入引擎前的校验与过滤
//   1) 必要列检查（含 打单员）
//   2) 关键字段空值拒绝（列出 1 基行号,表头为第 1 行）
//   3) 仅保留 打单员 含 "打单" 的行
// ==========================================

use crate::domain::table::{columns, RawTable};
use crate::importer::error::{ImportError, ImportResult};

/// 订单表必要列（含打单员）
pub const ORDER_IMPORT_COLUMNS: [&str; 5] = [
    columns::ORDER_WAVE,
    columns::ORDER_SHOP,
    columns::ORDER_PRODUCT_CODE,
    columns::ORDER_TYPE,
    columns::ORDER_OPERATOR,
];

/// 打单员列须包含的关键字
pub const PRINTING_DUTY_KEYWORD: &str = "打单";

pub struct OrderTablePreparer {
    table_name: String,
}

impl OrderTablePreparer {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub fn prepare(&self, table: RawTable) -> ImportResult<RawTable> {
        let missing = table.missing_columns(&ORDER_IMPORT_COLUMNS);
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                table: self.table_name.clone(),
                columns: missing,
            });
        }

        let blank_rows: Vec<usize> = table
            .records()
            .iter()
            .filter(|r| ORDER_IMPORT_COLUMNS.iter().any(|c| r.cell(c).is_none()))
            .map(|r| r.row_number)
            .collect();
        if !blank_rows.is_empty() {
            tracing::warn!(rows = blank_rows.len(), "订单表存在空值行");
            return Err(ImportError::BlankFields { rows: blank_rows });
        }

        let before = table.len();
        let table = table
            .retain_records(|r| r.text(columns::ORDER_OPERATOR).contains(PRINTING_DUTY_KEYWORD));

        tracing::debug!(
            kept = table.len(),
            dropped = before - table.len(),
            "订单表打单员过滤完成"
        );

        Ok(table)
    }
}

impl Default for OrderTablePreparer {
    fn default() -> Self {
        Self::new("1.xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(rows: &[Vec<&str>]) -> RawTable {
        RawTable::from_rows(&ORDER_IMPORT_COLUMNS, rows)
    }

    #[test]
    fn test_filters_non_printing_rows() {
        let table = orders(&[
            vec!["W1", "天猫/店", "A", "网店销售", "张三打单"],
            vec!["W1", "天猫/店", "A", "网店销售", "审核"],
            vec!["W2", "天猫/店", "B", "网店销售", "打单"],
        ]);

        let prepared = OrderTablePreparer::default().prepare(table).unwrap();
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared.records()[1].row_number, 4);
    }

    #[test]
    fn test_missing_operator_column() {
        let table = RawTable::from_rows(&["打印波次", "店铺", "货品商家编码", "订单类型"], &[]);

        let err = OrderTablePreparer::default().prepare(table).unwrap_err();
        assert_eq!(err.to_string(), "1.xlsx中缺少必要的列: 打单员");
    }

    #[test]
    fn test_blank_fields_rejected_with_row_numbers() {
        let table = orders(&[
            vec!["W1", "天猫/店", "A", "网店销售", "打单"],
            vec!["", "天猫/店", "A", "网店销售", "打单"],
            vec!["W1", "天猫/店", "  ", "网店销售", "打单"],
        ]);

        match OrderTablePreparer::default().prepare(table) {
            Err(ImportError::BlankFields { rows }) => assert_eq!(rows, vec![3, 4]),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
