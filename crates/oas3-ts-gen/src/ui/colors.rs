use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;
use http::Method;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of output shows. Commands pick a role, the palette picks the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Timestamp,
  /// Loading, generating and writing notices.
  Progress,
  /// Statistic labels and table headers.
  Label,
  Count,
  OperationName,
  Path,
  Tag,
  /// The `Warning:` marker and cycle numbers.
  Alert,
  /// Warning bodies and cycle members.
  Detail,
  Success,
}

type Rgb = (u8, u8, u8);

impl Role {
  /// `[dark, light]` background variants.
  const fn palette(self) -> [Rgb; 2] {
    match self {
      Self::Timestamp => [(118, 166, 166), (92, 62, 38)],
      Self::Progress => [(191, 126, 4), (70, 42, 25)],
      Self::Label => [(217, 164, 4), (176, 103, 66)],
      Self::Count | Self::OperationName => [(242, 211, 56), (199, 146, 76)],
      Self::Path => [(205, 205, 205), (48, 48, 48)],
      Self::Tag => [(118, 166, 166), (40, 111, 170)],
      Self::Alert => [(166, 84, 55), (211, 99, 70)],
      Self::Detail => [(191, 126, 4), (70, 42, 25)],
      Self::Success => [(118, 166, 166), (34, 142, 90)],
    }
  }
}

/// Safe methods read green, writes blue or yellow, deletes red.
fn method_palette(method: &str) -> Rgb {
  match method {
    "GET" | "HEAD" | "OPTIONS" => (96, 168, 96),
    "POST" => (84, 140, 204),
    "PUT" | "PATCH" => (214, 170, 60),
    "DELETE" => (204, 84, 72),
    _ => (150, 150, 150),
  }
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  pub const fn paint(&self, role: Role) -> Color {
    let [dark, light] = role.palette();
    self.rgb(match self.theme {
      Theme::Dark => dark,
      Theme::Light => light,
    })
  }

  pub fn method(&self, method: &Method) -> Color {
    self.rgb(method_palette(method.as_str()))
  }

  /// The same color for a `comfy_table` cell.
  pub fn cell(&self, role: Role) -> ComfyColor {
    to_comfy(self.paint(role))
  }

  pub fn method_cell(&self, method: &Method) -> ComfyColor {
    to_comfy(self.method(method))
  }

  const fn rgb(&self, (r, g, b): Rgb) -> Color {
    if self.enabled { Color::Rgb { r, g, b } } else { Color::Reset }
  }

  /// Help output styling. Always the dark palette, since clap renders before themes are detected.
  pub const fn clap_styles() -> Styles {
    Styles::styled()
      .header(Style::new().bold().underline().fg_color(clap_color(Role::Label)))
      .usage(Style::new().bold().fg_color(clap_color(Role::Label)))
      .literal(Style::new().fg_color(clap_color(Role::Success)))
      .placeholder(Style::new().fg_color(clap_color(Role::Tag)))
      .error(Style::new().bold().fg_color(clap_color(Role::Alert)))
      .valid(Style::new().fg_color(clap_color(Role::Success)))
      .invalid(Style::new().bold().fg_color(clap_color(Role::Alert)))
  }
}

const fn clap_color(role: Role) -> Option<ClapColor> {
  let [(r, g, b), _] = role.palette();
  Some(ClapColor::Rgb(RgbColor(r, g, b)))
}

fn to_comfy(color: Color) -> ComfyColor {
  match color {
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    _ => ComfyColor::Reset,
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => std::env::var("COLORFGBG")
      .ok()
      .and_then(|value| theme_from_colorfgbg(&value))
      .unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); ANSI backgrounds 8 and up are light.
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
  let background = value.rsplit(';').next()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
