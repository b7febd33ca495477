//! QR Context - 渲染参数合并
//!
//! 默认参数以 JSON 映射表示，调用方参数按键覆盖：
//! - 顶层键：浅合并，调用方的值整体替换默认值
//! - `color`：只对 `dark` / `light` 两个键做一层合并
//!
//! 其它嵌套结构不做递归合并。未识别的键原样保留，交给编码器处理。

use serde_json::{json, Map, Value};

/// 纠错等级键
pub const ERROR_CORRECTION_LEVEL_KEY: &str = "errorCorrectionLevel";
/// 输出格式键
pub const FORMAT_KEY: &str = "type";
/// 输出格式别名键
pub const FORMAT_ALIAS_KEY: &str = "outputFormat";
/// 有损格式质量键
pub const QUALITY_KEY: &str = "quality";
/// 静区宽度键
pub const MARGIN_KEY: &str = "margin";
/// 颜色键
pub const COLOR_KEY: &str = "color";
/// 前景色别名键
pub const COLOR_DARK_ALIAS_KEY: &str = "colorDark";
/// 背景色别名键
pub const COLOR_LIGHT_ALIAS_KEY: &str = "colorLight";

/// `color` 中参与合并的键
const COLOR_SUB_KEYS: [&str; 2] = ["dark", "light"];

/// 顶层别名键与 `color` 子键的对应关系
const COLOR_ALIASES: [(&str, &str); 2] = [
    (COLOR_DARK_ALIAS_KEY, "dark"),
    (COLOR_LIGHT_ALIAS_KEY, "light"),
];

/// 默认渲染参数
pub fn default_options() -> Map<String, Value> {
    let defaults = json!({
        ERROR_CORRECTION_LEVEL_KEY: "H",
        FORMAT_KEY: "png",
        QUALITY_KEY: 0.92,
        MARGIN_KEY: 1,
        COLOR_KEY: {
            "dark": "#000000",
            "light": "#ffffff",
        },
    });

    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// 将调用方参数合并到默认参数之上
///
/// `overrides` 不是对象时（缺失、null、字符串、数组等）视为没有覆盖项。
/// `outputFormat` 是 `type` 的别名，二者同时出现时以 `type` 为准。
/// `colorDark` / `colorLight` 是 `color.dark` / `color.light` 的别名，
/// 嵌套的 `color` 中给出同一子键时以嵌套值为准。
pub fn merge_options(overrides: Option<&Value>) -> Map<String, Value> {
    let mut effective = default_options();

    let overrides = match overrides {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => return effective,
        Some(other) => {
            tracing::warn!(kind = %value_kind(other), "Ignoring non-object render options");
            return effective;
        }
    };

    for (key, value) in overrides {
        match key.as_str() {
            COLOR_KEY => merge_color(&mut effective, value),
            FORMAT_ALIAS_KEY => {
                if !overrides.contains_key(FORMAT_KEY) {
                    effective.insert(FORMAT_KEY.to_string(), value.clone());
                }
            }
            COLOR_DARK_ALIAS_KEY | COLOR_LIGHT_ALIAS_KEY => {}
            _ => {
                effective.insert(key.clone(), value.clone());
            }
        }
    }

    merge_color_aliases(&mut effective, overrides);

    effective
}

fn merge_color_aliases(effective: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (alias, sub_key) in COLOR_ALIASES {
        let Some(value) = overrides.get(alias) else {
            continue;
        };

        let nested_wins = match overrides.get(COLOR_KEY) {
            Some(Value::Object(color)) => color.contains_key(sub_key),
            // 非对象的 color 整体替换，别名不再生效
            Some(_) => true,
            None => false,
        };
        if nested_wins {
            continue;
        }

        if let Some(Value::Object(color)) = effective.get_mut(COLOR_KEY) {
            color.insert(sub_key.to_string(), value.clone());
        }
    }
}

fn merge_color(effective: &mut Map<String, Value>, value: &Value) {
    let Value::Object(overrides) = value else {
        // 非对象的颜色值整体替换，由编码器判断是否合法
        effective.insert(COLOR_KEY.to_string(), value.clone());
        return;
    };

    let mut color = match effective.remove(COLOR_KEY) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for sub_key in COLOR_SUB_KEYS {
        if let Some(v) = overrides.get(sub_key) {
            color.insert(sub_key.to_string(), v.clone());
        }
    }

    effective.insert(COLOR_KEY.to_string(), Value::Object(color));
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_yield_defaults() {
        let merged = merge_options(Some(&json!({})));
        assert_eq!(merged, default_options());
        assert_eq!(merged[ERROR_CORRECTION_LEVEL_KEY], "H");
        assert_eq!(merged[MARGIN_KEY], 1);
        assert_eq!(merged[COLOR_KEY]["dark"], "#000000");
        assert_eq!(merged[COLOR_KEY]["light"], "#ffffff");
    }

    #[test]
    fn test_missing_overrides_yield_defaults() {
        assert_eq!(merge_options(None), default_options());
        assert_eq!(merge_options(Some(&Value::Null)), default_options());
    }

    #[test]
    fn test_top_level_keys_override_one_by_one() {
        let merged = merge_options(Some(&json!({ "margin": 0, "errorCorrectionLevel": "L" })));
        assert_eq!(merged[MARGIN_KEY], 0);
        assert_eq!(merged[ERROR_CORRECTION_LEVEL_KEY], "L");
        assert_eq!(merged[FORMAT_KEY], "png");
        assert_eq!(merged[QUALITY_KEY], 0.92);
    }

    #[test]
    fn test_dark_override_keeps_light_default() {
        let merged = merge_options(Some(&json!({ "color": { "dark": "#ff0000" } })));
        assert_eq!(merged[COLOR_KEY]["dark"], "#ff0000");
        assert_eq!(merged[COLOR_KEY]["light"], "#ffffff");
    }

    #[test]
    fn test_color_merge_ignores_other_nested_keys() {
        let merged = merge_options(Some(&json!({ "color": { "light": "#eee", "accent": "#123" } })));
        let color = merged[COLOR_KEY].as_object().unwrap();
        assert_eq!(color.len(), 2);
        assert_eq!(color["light"], "#eee");
    }

    #[test]
    fn test_non_object_color_replaces_whole_value() {
        let merged = merge_options(Some(&json!({ "color": "red" })));
        assert_eq!(merged[COLOR_KEY], "red");
    }

    #[test]
    fn test_nested_values_outside_color_are_replaced_not_merged() {
        let merged = merge_options(Some(&json!({ "extra": { "a": 1 } })));
        assert_eq!(merged["extra"], json!({ "a": 1 }));
    }

    #[test]
    fn test_unrecognized_keys_pass_through() {
        let merged = merge_options(Some(&json!({ "maskPattern": 3 })));
        assert_eq!(merged["maskPattern"], 3);
    }

    #[test]
    fn test_output_format_alias() {
        let merged = merge_options(Some(&json!({ "outputFormat": "svg" })));
        assert_eq!(merged[FORMAT_KEY], "svg");
        assert!(!merged.contains_key(FORMAT_ALIAS_KEY));

        let merged = merge_options(Some(&json!({ "outputFormat": "svg", "type": "jpeg" })));
        assert_eq!(merged[FORMAT_KEY], "jpeg");
    }

    #[test]
    fn test_color_dark_alias_keeps_light_default() {
        let merged = merge_options(Some(&json!({ "colorDark": "#ff0000" })));
        assert_eq!(merged[COLOR_KEY]["dark"], "#ff0000");
        assert_eq!(merged[COLOR_KEY]["light"], "#ffffff");
        assert!(!merged.contains_key(COLOR_DARK_ALIAS_KEY));
    }

    #[test]
    fn test_color_aliases_combine_with_nested_color() {
        let merged = merge_options(Some(&json!({
            "colorLight": "#eeeeee",
            "colorDark": "#ff0000",
            "color": { "dark": "#0000ff" },
        })));
        assert_eq!(merged[COLOR_KEY]["dark"], "#0000ff");
        assert_eq!(merged[COLOR_KEY]["light"], "#eeeeee");
        assert!(!merged.contains_key(COLOR_LIGHT_ALIAS_KEY));
    }

    #[test]
    fn test_color_alias_ignored_when_color_is_not_an_object() {
        let merged = merge_options(Some(&json!({ "color": "red", "colorDark": "#ff0000" })));
        assert_eq!(merged[COLOR_KEY], "red");
    }

    #[test]
    fn test_non_object_overrides_are_ignored() {
        assert_eq!(merge_options(Some(&json!("margin"))), default_options());
        assert_eq!(merge_options(Some(&json!([1, 2]))), default_options());
    }
}
