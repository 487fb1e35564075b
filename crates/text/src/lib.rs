use owo_colors::{AnsiColors, OwoColorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl ColorCode {
    fn parse(code: char) -> Option<ColorCode> {
        Some(match code {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            _ => return None,
        })
    }

    fn ansi(self) -> AnsiColors {
        match self {
            ColorCode::Black => AnsiColors::Black,
            ColorCode::DarkBlue => AnsiColors::Blue,
            ColorCode::DarkGreen => AnsiColors::Green,
            ColorCode::DarkAqua => AnsiColors::Cyan,
            ColorCode::DarkRed => AnsiColors::Red,
            ColorCode::DarkPurple => AnsiColors::Magenta,
            ColorCode::Gold => AnsiColors::Yellow,
            ColorCode::Gray => AnsiColors::White,
            ColorCode::DarkGray => AnsiColors::BrightBlack,
            ColorCode::Blue => AnsiColors::BrightBlue,
            ColorCode::Green => AnsiColors::BrightGreen,
            ColorCode::Aqua => AnsiColors::BrightCyan,
            ColorCode::Red => AnsiColors::BrightRed,
            ColorCode::LightPurple => AnsiColors::BrightMagenta,
            ColorCode::Yellow => AnsiColors::BrightYellow,
            ColorCode::White => AnsiColors::BrightWhite,
        }
    }
}

pub struct TextComponentBuilder {
    component: TextComponent,
}

impl TextComponentBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        let component = TextComponent {
            text: text.into(),
            ..Default::default()
        };
        Self { component }
    }

    pub fn color_code(mut self, color: ColorCode) -> Self {
        self.component.color = Some(color);
        self
    }

    pub fn finish(self) -> TextComponent {
        self.component
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<ColorCode>,
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    /// Red text, used for command failures.
    pub fn failure(message: impl Into<String>) -> TextComponent {
        TextComponentBuilder::new(message)
            .color_code(ColorCode::Red)
            .finish()
    }

    /// Green text, used for operator confirmations.
    pub fn success(message: impl Into<String>) -> TextComponent {
        TextComponentBuilder::new(message)
            .color_code(ColorCode::Green)
            .finish()
    }

    /// Parses `&`-prefixed legacy color codes into a single component whose
    /// `extra` holds one child per colored run.
    pub fn from_legacy_text(message: &str) -> TextComponent {
        let mut components = Vec::new();
        let mut cur_component: TextComponent = Default::default();

        let mut chars = message.chars();
        while let Some(c) = chars.next() {
            if c == '&' {
                if let Some(code) = chars.next() {
                    match code {
                        'l' => {
                            if !cur_component.text.is_empty() {
                                components.push(cur_component.clone());
                                cur_component.text.clear();
                            }
                            cur_component.bold = true;
                        }
                        'o' => {
                            if !cur_component.text.is_empty() {
                                components.push(cur_component.clone());
                                cur_component.text.clear();
                            }
                            cur_component.italic = true;
                        }
                        'r' => {
                            components.push(cur_component);
                            cur_component = Default::default();
                        }
                        code => match ColorCode::parse(code) {
                            Some(color) => {
                                components.push(cur_component);
                                cur_component = Default::default();
                                cur_component.color = Some(color);
                            }
                            None => {
                                cur_component.text.push(c);
                                cur_component.text.push(code);
                            }
                        },
                    }
                    continue;
                }
            }
            cur_component.text.push(c);
        }
        components.push(cur_component);
        components.retain(|component| !component.text.is_empty());

        TextComponent {
            extra: components,
            ..Default::default()
        }
    }

    /// The text of this component and all of its children with styling removed.
    pub fn to_plain_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.extra {
            out.push_str(&child.to_plain_text());
        }
        out
    }

    /// Renders the component with ANSI escapes for terminal output.
    pub fn to_ansi_string(&self) -> String {
        self.ansi_with(None, false)
    }

    fn ansi_with(&self, parent_color: Option<ColorCode>, parent_bold: bool) -> String {
        let color = self.color.or(parent_color);
        let bold = self.bold || parent_bold;

        let mut out = match (color, bold) {
            _ if self.text.is_empty() => String::new(),
            (Some(color), true) => self.text.color(color.ansi()).bold().to_string(),
            (Some(color), false) => self.text.color(color.ansi()).to_string(),
            (None, true) => self.text.bold().to_string(),
            (None, false) => self.text.clone(),
        };
        for child in &self.extra {
            out.push_str(&child.ansi_with(color, bold));
        }
        out
    }
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        TextComponent {
            text: value.into(),
            ..Default::default()
        }
    }
}
