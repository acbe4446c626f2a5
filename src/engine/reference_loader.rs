// ==========================================
// 订单分组汇总系统 - 参考数据加载器
// ==========================================
// 职责: 编码对应关系表 → CodeEntry / 款式排序
//       渠道映射表 → 有序 MappingRule 列表
// 红线: 优先级前向填充必须按表原始行序单次遍历
// ==========================================

use crate::config::EngineConfig;
use crate::domain::reference::{CodeEntry, MappingRule, ReferenceData};
use crate::domain::table::{columns, RawRecord, RawTable};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashMap;

pub const CODE_TABLE_NAME: &str = "编码对应关系";
pub const MAPPING_TABLE_NAME: &str = "渠道映射表";

/// ReferenceLoader - 参考数据加载器
pub struct ReferenceLoader<'a> {
    config: &'a EngineConfig,
}

impl<'a> ReferenceLoader<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// 加载全部参考数据
    pub fn load(
        &self,
        code_table: &RawTable,
        mapping_table: &RawTable,
    ) -> EngineResult<ReferenceData> {
        let (codes, style_sort) = self.load_codes(code_table)?;
        let mapping_rules = self.load_mapping_rules(mapping_table)?;
        let brush_style = self.resolve_brush_style(&codes);

        tracing::debug!(
            codes = codes.len(),
            styles = style_sort.len(),
            rules = mapping_rules.len(),
            brush_style = %brush_style,
            "参考数据加载完成"
        );

        Ok(ReferenceData {
            codes,
            style_sort,
            mapping_rules,
            brush_style,
        })
    }

    /// 加载编码对应关系
    ///
    /// # 规则
    /// - 优先级为空 → 取上方最近的非空优先级；上方无值 → default_priority
    /// - 排序为空或列缺失 → default_sort_rank
    /// - 重复编码 → 后出现的行覆盖先出现的行
    /// - 款式排序值 = 该款式所有行的最小排序值
    pub fn load_codes(
        &self,
        table: &RawTable,
    ) -> EngineResult<(HashMap<String, CodeEntry>, HashMap<String, i64>)> {
        let missing = table.missing_columns(&[
            columns::CODE_CODE,
            columns::CODE_NAME,
            columns::CODE_PRIORITY,
        ]);
        if !missing.is_empty() {
            return Err(EngineError::MissingColumns {
                table: CODE_TABLE_NAME.to_string(),
                columns: missing,
            });
        }

        let mut codes: HashMap<String, CodeEntry> = HashMap::new();
        let mut style_sort: HashMap<String, i64> = HashMap::new();
        let mut last_priority: Option<i64> = None;

        for record in table.records() {
            if let Some(p) = parse_int_cell(record, columns::CODE_PRIORITY)? {
                last_priority = Some(p);
            }

            let code = match record.cell(columns::CODE_CODE) {
                Some(c) => c.to_string(),
                None => continue,
            };
            let style_name = record.text(columns::CODE_NAME).to_string();
            let priority = last_priority.unwrap_or(self.config.default_priority);
            let sort_rank = parse_int_cell(record, columns::CODE_SORT)?
                .unwrap_or(self.config.default_sort_rank);

            style_sort
                .entry(style_name.clone())
                .and_modify(|rank| *rank = (*rank).min(sort_rank))
                .or_insert(sort_rank);

            codes.insert(
                code.clone(),
                CodeEntry {
                    code,
                    style_name,
                    priority,
                    sort_rank,
                },
            );
        }

        Ok((codes, style_sort))
    }

    /// 加载渠道映射规则
    ///
    /// 任一单元格为空的行被丢弃；丢弃后无规则 → EmptyMappingTable
    pub fn load_mapping_rules(&self, table: &RawTable) -> EngineResult<Vec<MappingRule>> {
        let channel_col = table.resolve_column(columns::MAPPING_CHANNEL);
        let type_col = table.resolve_column(columns::MAPPING_TYPE);
        let out_channel_col = table.resolve_column(columns::MAPPING_OUTPUT_CHANNEL);
        let out_type_col = table.resolve_column(columns::MAPPING_OUTPUT_TYPE);

        let (channel_col, type_col, out_channel_col, out_type_col) =
            match (channel_col, type_col, out_channel_col, out_type_col) {
                (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                (a, b, c, d) => {
                    let missing = [
                        (a, columns::MAPPING_CHANNEL[0]),
                        (b, columns::MAPPING_TYPE[0]),
                        (c, columns::MAPPING_OUTPUT_CHANNEL[0]),
                        (d, columns::MAPPING_OUTPUT_TYPE[0]),
                    ]
                    .iter()
                    .filter(|(found, _)| found.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect();
                    return Err(EngineError::MissingColumns {
                        table: MAPPING_TABLE_NAME.to_string(),
                        columns: missing,
                    });
                }
            };

        let rules: Vec<MappingRule> = table
            .records()
            .iter()
            .filter_map(|record| {
                Some(MappingRule {
                    input_channel_prefix: record.cell(channel_col)?.to_string(),
                    input_order_type_tag: record.cell(type_col)?.to_string(),
                    output_channel: record.cell(out_channel_col)?.to_string(),
                    output_order_type: record.cell(out_type_col)?.to_string(),
                })
            })
            .collect();

        if rules.is_empty() {
            return Err(EngineError::EmptyMappingTable);
        }

        Ok(rules)
    }

    /// 刷单款式：编码等于刷单字面量的条目款式，否则使用默认占位款式
    fn resolve_brush_style(&self, codes: &HashMap<String, CodeEntry>) -> String {
        codes
            .get(self.config.brush_code.as_str())
            .map(|entry| entry.style_name.clone())
            .unwrap_or_else(|| self.config.default_brush_style.clone())
    }
}

/// 解析整数单元格（兼容 "2.0" 这类表格导出的整值浮点）
fn parse_int_cell(record: &RawRecord, column: &str) -> EngineResult<Option<i64>> {
    let value = match record.cell(column) {
        Some(v) => v,
        None => return Ok(None),
    };

    if let Ok(n) = value.parse::<i64>() {
        return Ok(Some(n));
    }

    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(f as i64)),
        _ => Err(EngineError::InvalidCell {
            table: CODE_TABLE_NAME.to_string(),
            row: record.row_number,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_table(rows: &[Vec<&str>]) -> RawTable {
        RawTable::from_rows(&["货品商家编码", "名称", "优先级", "排序"], rows)
    }

    fn mapping_table(rows: &[Vec<&str>]) -> RawTable {
        RawTable::from_rows(&["渠道", "类型", "输出渠道", "输出类型"], rows)
    }

    #[test]
    fn test_priority_forward_fill_in_table_order() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = code_table(&[
            vec!["Z1", "S1", "", "1"],
            vec!["B2", "S2", "3", "2"],
            vec!["A3", "S3", "", ""],
            vec!["C4", "S4", "1.0", "4"],
            vec!["", "S5", "7", "5"],
            vec!["D5", "S6", "", "6"],
        ]);

        let (codes, _) = loader.load_codes(&table).unwrap();
        assert_eq!(codes["Z1"].priority, 999);
        assert_eq!(codes["B2"].priority, 3);
        assert_eq!(codes["A3"].priority, 3);
        assert_eq!(codes["C4"].priority, 1);
        // 空编码行仍参与前向填充
        assert_eq!(codes["D5"].priority, 7);
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_duplicate_code_last_row_wins() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = code_table(&[vec!["A", "S1", "1", "5"], vec!["A", "S2", "2", "3"]]);

        let (codes, style_sort) = loader.load_codes(&table).unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes["A"].style_name, "S2");
        assert_eq!(codes["A"].priority, 2);
        // 被覆盖行的排序值仍计入其款式
        assert_eq!(style_sort["S1"], 5);
        assert_eq!(style_sort["S2"], 3);
    }

    #[test]
    fn test_style_sort_takes_minimum() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = code_table(&[
            vec!["A", "S1", "1", "9"],
            vec!["B", "S1", "1", "4"],
            vec!["C", "S1", "1", ""],
        ]);

        let (codes, style_sort) = loader.load_codes(&table).unwrap();
        assert_eq!(style_sort["S1"], 4);
        assert_eq!(codes["C"].sort_rank, 999);
    }

    #[test]
    fn test_sort_column_optional() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = RawTable::from_rows(&["货品商家编码", "名称", "优先级"], &[vec!["A", "S1", "1"]]);

        let (codes, _) = loader.load_codes(&table).unwrap();
        assert_eq!(codes["A"].sort_rank, 999);
    }

    #[test]
    fn test_code_table_missing_columns() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = RawTable::from_rows(&["货品商家编码"], &[vec!["A"]]);

        let err = loader.load_codes(&table).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingColumns {
                table: CODE_TABLE_NAME.to_string(),
                columns: vec!["名称".to_string(), "优先级".to_string()],
            }
        );
    }

    #[test]
    fn test_invalid_priority_cell() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = code_table(&[vec!["A", "S1", "高", "1"]]);

        let err = loader.load_codes(&table).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCell { row: 2, .. }));
    }

    #[test]
    fn test_mapping_drops_incomplete_rows() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = mapping_table(&[
            vec!["自营/", "网店销售", "自营", "新订单"],
            vec!["分销/", "", "分销", "新订单"],
            vec!["代发/", "订单补发", "代发", "补发单"],
        ]);

        let rules = loader.load_mapping_rules(&table).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].input_channel_prefix, "自营/");
        assert_eq!(rules[1].output_order_type, "补发单");
    }

    #[test]
    fn test_mapping_empty_after_filter() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = mapping_table(&[vec!["自营/", "网店销售", "", "新订单"]]);

        assert_eq!(
            loader.load_mapping_rules(&table).unwrap_err(),
            EngineError::EmptyMappingTable
        );
    }

    #[test]
    fn test_mapping_alias_columns() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = RawTable::from_rows(
            &["店铺渠道", "订单类型", "输出渠道", "输出订单类型"],
            &[vec!["自营/", "网店销售", "自营", "新订单"]],
        );

        assert_eq!(loader.load_mapping_rules(&table).unwrap().len(), 1);
    }

    #[test]
    fn test_mapping_missing_columns() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let table = RawTable::from_rows(&["渠道", "类型"], &[vec!["自营/", "网店销售"]]);

        let err = loader.load_mapping_rules(&table).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingColumns {
                table: MAPPING_TABLE_NAME.to_string(),
                columns: vec!["输出渠道".to_string(), "输出类型".to_string()],
            }
        );
    }

    #[test]
    fn test_brush_style_from_code_table() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let codes = code_table(&[vec!["刷单", "刷单款", "1", "1"]]);
        let mapping = mapping_table(&[vec!["自营/", "网店销售", "自营", "新订单"]]);

        let data = loader.load(&codes, &mapping).unwrap();
        assert_eq!(data.brush_style, "刷单款");
    }

    #[test]
    fn test_brush_style_default_placeholder() {
        let config = EngineConfig::default();
        let loader = ReferenceLoader::new(&config);
        let codes = code_table(&[vec!["A", "S1", "1", "1"]]);
        let mapping = mapping_table(&[vec!["自营/", "网店销售", "自营", "新订单"]]);

        let data = loader.load(&codes, &mapping).unwrap();
        assert_eq!(data.brush_style, "洗脸巾/其它包数");
    }
}
