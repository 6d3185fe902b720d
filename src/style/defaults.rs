use serde_json::{Value, json};

/// Built-in style tree. Every path an element builder reads has an entry
/// here, so user overrides only ever narrow the gap to taste; builders
/// still carry their own hardcoded fallbacks for paths a hand-edited
/// override file may have clobbered with the wrong shape.
pub fn builtin_defaults() -> Value {
    json!({
        "document": {
            "pageSize": "A4",
            "pageOrientation": "portrait",
            "margins": { "top": 25.4, "bottom": 25.4, "left": 31.8, "right": 31.8 },
            "grid": { "charPerLine": 0, "linePerPage": 0 }
        },
        "heading": {
            "font": "Calibri Light",
            "color": "2F5496",
            "bold": true,
            "sizes": { "h1": 22.0, "h2": 18.0, "h3": 16.0, "h4": 14.0, "h5": 12.0, "h6": 11.0 },
            "alignment": { "h1": "left", "h2": "left", "h3": "left", "h4": "left", "h5": "left", "h6": "left" },
            "indent": { "h1": 0, "h2": 0, "h3": 0, "h4": 0, "h5": 0, "h6": 0 },
            "prefix": { "h1": "", "h2": "", "h3": "", "h4": "", "h5": "", "h6": "" },
            "usePrefix": { "h1": false, "h2": false, "h3": false, "h4": false, "h5": false, "h6": false }
        },
        "paragraph": {
            "font": "Calibri",
            "size": 11.0,
            "color": "000000",
            "firstLineIndent": 800,
            "alignment": "justify",
            "lineSpacingRule": "auto",
            "lineSpacing": 1.15,
            "spacing": 8.0
        },
        "list": {
            "unordered": {
                "font": "Calibri",
                "size": 11.0,
                "bulletChars": ["●", "○", "■"],
                "indentLevel": 420
            },
            "ordered": {
                "font": "Calibri",
                "size": 11.0,
                "numberFormats": ["%1.", "%2.", "%3."],
                "indentLevel": 420
            }
        },
        "table": {
            "borderColor": "000000",
            "borderWidth": 4,
            "headerBackground": "DDDDDD",
            "headerFont": "Calibri",
            "fontSize": 10.5,
            "alignment": "center"
        },
        "code": {
            "font": "Consolas",
            "size": 10.0,
            "color": "333333",
            "backgroundColor": "F5F5F5"
        },
        "blockquote": {
            "font": "Calibri",
            "size": 11.0,
            "color": "666666",
            "borderColor": "CCCCCC",
            "leftIndent": 400,
            "firstLineIndent": 0
        },
        "image": {
            "maxWidth": 6000,
            "alignment": "center"
        }
    })
}
