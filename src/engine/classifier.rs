// ==========================================
// 订单分组汇总系统 - 行分类器
// ==========================================
// 职责: 对单行订单给出处理结论（不修改任何状态）
// 判定顺序:
//   1) 非当天波次     → NonToday
//   2) 订单类型归一化 → 无法识别则 UnknownOrderType（静默丢弃）
//   3) 排除波次       → Excluded
//   4) 刷单波次标记
//   5) 渠道映射       → 未命中则 Unmapped（可选旧版渠道推导）
//   6) 刷单行         → Brush
//   7) 普通行         → Regular（附带编码解析与分类结果）
// ==========================================

use crate::config::RunContext;
use crate::domain::order::{OrderRow, ParsedLine};
use crate::domain::reference::{ControlSet, ReferenceData};
use crate::domain::types::OrderKind;
use crate::engine::code_resolver::{self, Resolution};

/// 单行处理结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// 非当天波次
    NonToday { wave: String },
    /// 订单类型无法识别
    UnknownOrderType { tag: String },
    /// 排除波次
    Excluded { wave: String },
    /// 未匹配到渠道映射
    Unmapped {
        channel_key: String,
        tag: String,
        /// 所在波次是否为刷单波次
        brush_wave: Option<String>,
    },
    /// 刷单行
    Brush {
        wave: String,
        channel: String,
        style: String,
    },
    /// 普通行
    Regular {
        channel: String,
        order_type: String,
        line: ParsedLine,
        resolution: Resolution,
    },
}

/// RowClassifier - 行分类器
pub struct RowClassifier<'a> {
    ctx: &'a RunContext,
    reference: &'a ReferenceData,
    control: &'a ControlSet,
    today_mmdd: String,
}

impl<'a> RowClassifier<'a> {
    pub fn new(ctx: &'a RunContext, reference: &'a ReferenceData, control: &'a ControlSet) -> Self {
        Self {
            ctx,
            reference,
            control,
            today_mmdd: ctx.today.format("%m%d").to_string(),
        }
    }

    pub fn classify(&self, row: &OrderRow) -> RowOutcome {
        let wave = row.wave_id.as_deref();

        if let Some(wave) = wave {
            if self.is_non_today_wave(wave) {
                return RowOutcome::NonToday {
                    wave: wave.to_string(),
                };
            }
        }

        let kind = match OrderKind::from_tag(&row.order_type_tag) {
            Some(kind) => kind,
            None => {
                return RowOutcome::UnknownOrderType {
                    tag: row.order_type_tag.clone(),
                }
            }
        };

        if let Some(wave) = wave {
            if self.control.is_excluded(wave) {
                return RowOutcome::Excluded {
                    wave: wave.to_string(),
                };
            }
        }

        let brush_wave = wave
            .filter(|w| self.control.is_brush(w))
            .map(str::to_string);

        let channel_key = format!("{}/", row.shop_prefix());
        let (channel, order_type) = match self.map_channel(row, &channel_key, kind) {
            Some(mapped) => mapped,
            None => {
                return RowOutcome::Unmapped {
                    channel_key,
                    tag: row.order_type_tag.clone(),
                    brush_wave,
                }
            }
        };

        if let Some(wave) = brush_wave {
            return RowOutcome::Brush {
                wave,
                channel,
                style: self.reference.brush_style.clone(),
            };
        }

        let line = code_resolver::parse(&row.product_code_field);
        let resolution =
            code_resolver::classify(&line, self.reference, self.ctx.config.ignored_priority);

        RowOutcome::Regular {
            channel,
            order_type,
            line,
            resolution,
        }
    }

    /// 波次号形如 PB + 6 位日期数字 + 序号，月日与今天不同
    pub fn is_non_today_wave(&self, wave: &str) -> bool {
        match wave_month_day(wave, &self.ctx.config.wave_prefix) {
            Some(mmdd) => mmdd != self.today_mmdd,
            None => false,
        }
    }

    fn map_channel(
        &self,
        row: &OrderRow,
        channel_key: &str,
        kind: OrderKind,
    ) -> Option<(String, String)> {
        if let Some(rule) = self.reference.find_rule(channel_key, &row.order_type_tag) {
            return Some((rule.output_channel.clone(), rule.output_order_type.clone()));
        }

        if self.ctx.config.legacy_channel_fallback {
            return Some((legacy_channel(&row.shop_name), kind.label().to_string()));
        }

        None
    }
}

/// 提取波次号中的月日（MMDD）
///
/// 要求: 以前缀开头、总长度 ≥ 10、前缀后 6 位均为数字（YYMMDD）
pub fn wave_month_day<'w>(wave: &'w str, prefix: &str) -> Option<&'w str> {
    let rest = wave.strip_prefix(prefix)?;
    if wave.chars().count() < 10 {
        return None;
    }
    let digits = rest.get(0..6)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.get(2..6)
}

/// 旧版渠道推导
///
/// - 店铺名不含 '/' → 其他
/// - 前缀以 "补发" 开头 → 自营
/// - 否则取前缀前两个字符
pub fn legacy_channel(shop_name: &str) -> String {
    let Some((prefix, _)) = shop_name.split_once('/') else {
        return "其他".to_string();
    };
    let prefix = prefix.trim();
    if prefix.starts_with("补发") {
        "自营".to_string()
    } else {
        prefix.chars().take(2).collect()
    }
}
