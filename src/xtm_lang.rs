// Localized UI strings for English and Chinese
// Format strings use "{}" placeholders filled with Lang::fill

#[derive(Clone, Debug)]
pub struct Assets {
    pub app_title: &'static str,

    // Menu items
    pub menu_help: &'static str,
    pub menu_new: &'static str,
    pub menu_icons: &'static str,
    pub menu_language: &'static str,
    pub menu_exit: &'static str,

    // Help modal
    pub help_controls: &'static str,
    pub help_move: &'static str,
    pub help_reveal: &'static str,
    pub help_mark: &'static str,
    pub help_goal: &'static str,

    // Game over modal
    pub over_title: &'static str,
    pub over_won: &'static str,
    pub over_lost: &'static str,
    pub over_again: &'static str,

    // Status bar
    pub status_flags_fmt: &'static str, // " Flags: {}/{} "

    // Buttons
    pub btn_close: &'static str,
    pub btn_yes: &'static str,
    pub btn_no: &'static str,

    // Terminal size messages
    pub tsmsg_title: &'static str,
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum required: {} x {}"
}

pub fn english_assets() -> Assets {
    Assets {
        app_title: "Minesweeper",

        menu_help: "Help",
        menu_new: "New",
        menu_icons: "Icons",
        menu_language: "Language",
        menu_exit: "Exit",

        help_controls: " Controls:",
        help_move: "  Mouse | Arrows  - move cursor",
        help_reveal: "  L-Click | Space - reveal",
        help_mark: "  R-Click | F     - flag / ? / clear",
        help_goal: " Reveal every tile that is not a mine.",

        over_title: "Game Over",
        over_won: "Congratulations! You won!",
        over_lost: "Boom! Game over.",
        over_again: "Do you want to play again?",

        status_flags_fmt: " Flags: {}/{} ",

        btn_close: "CLOSE",
        btn_yes: "YES",
        btn_no: "NO",

        tsmsg_title: "Resize Terminal",
        tsmsg_line1: "Terminal size too small.",
        tsmsg_line2: "Minimum required: {} x {}",
    }
}

pub fn chinese_assets() -> Assets {
    Assets {
        app_title: "扫雷",

        menu_help: "帮助",
        menu_new: "新游戏",
        menu_icons: "图标",
        menu_language: "语言",
        menu_exit: "退出",

        help_controls: " 操作：",
        help_move: "  鼠标 | 方向键   - 移动光标",
        help_reveal: "  左键 | 空格     - 翻开",
        help_mark: "  右键 | F        - 旗帜 / ? / 清除",
        help_goal: " 翻开所有不是地雷的格子。",

        over_title: "游戏结束",
        over_won: "恭喜！你赢了！",
        over_lost: "轰！游戏结束。",
        over_again: "再玩一局吗？",

        status_flags_fmt: " 旗帜：{}/{} ",

        btn_close: "关闭",
        btn_yes: "是",
        btn_no: "否",

        tsmsg_title: "调整终端",
        tsmsg_line1: "终端尺寸太小。",
        tsmsg_line2: "最小需要：{} x {}",
    }
}

#[derive(Clone, Debug)]
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Unknown codes fall back to English
    pub fn new(code: &str) -> Self {
        let mut lang = Lang {
            current_lang: String::new(),
            assets: english_assets(),
        };
        lang.set_language(code);
        lang
    }

    pub fn set_language(&mut self, code: &str) {
        let code = if code == "zh" { "zh" } else { "en" };
        self.current_lang = code.to_string();
        self.assets = if code == "zh" {
            chinese_assets()
        } else {
            english_assets()
        };
    }

    /// Switch between the two languages and return the new code
    pub fn toggle(&mut self) -> &str {
        let next = if self.current_lang == "zh" { "en" } else { "zh" };
        self.set_language(next);
        &self.current_lang
    }

    /// Replace "{}" placeholders left to right
    pub fn fill(fmt: &str, args: &[&dyn std::fmt::Display]) -> String {
        let mut out = String::with_capacity(fmt.len());
        let mut rest = fmt;
        for arg in args {
            match rest.find("{}") {
                Some(pos) => {
                    out.push_str(&rest[..pos]);
                    out.push_str(&arg.to_string());
                    rest = &rest[pos + 2..];
                }
                None => break,
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_is_english() {
        let lang = Lang::new("fr");
        assert_eq!(lang.current_lang, "en");
        assert_eq!(lang.assets.over_won, "Congratulations! You won!");
    }

    #[test]
    fn test_toggle() {
        let mut lang = Lang::new("en");
        assert_eq!(lang.toggle(), "zh");
        assert_eq!(lang.assets.btn_yes, "是");
        assert_eq!(lang.toggle(), "en");
        assert_eq!(lang.assets.btn_yes, "YES");
    }

    #[test]
    fn test_fill() {
        let a = english_assets();
        assert_eq!(Lang::fill(a.status_flags_fmt, &[&3, &99]), " Flags: 3/99 ");
        assert_eq!(Lang::fill(a.tsmsg_line2, &[&80, &24]), "Minimum required: 80 x 24");
        assert_eq!(Lang::fill("no placeholders", &[&1]), "no placeholders");
    }
}
