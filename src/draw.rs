use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::bracket::BracketView;
use crate::components::theme::ThemeColor;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

const HELP_TEXT: &[(&str, &str)] = &[
    ("h j k l / arrows", "scroll"),
    ("PgUp PgDn / Ctrl-u Ctrl-d", "scroll a page"),
    ("g / G", "top / bottom"),
    ("mouse wheel", "scroll"),
    ("left drag", "pan the bracket"),
    ("r", "reload bracket"),
    ("f", "toggle full screen"),
    ("\"", "toggle logs"),
    ("?", "help (Esc to close)"),
    ("q / Ctrl-c", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let mut parts = vec!["bracketui".to_string()];
    if let Some(bracket) = app.state.bracket.bracket.as_ref() {
        parts.push(bracket.league_id.clone());
        parts.push(bracket.format.label().to_string());
    }
    if let Some(at) = app.state.bracket.loaded_at {
        parts.push(format!("updated {}", at.format("%H:%M:%S")));
    }

    let title = Paragraph::new(format!(" {}", parts.join(" │ ")))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(title, header[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.state.theme;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.style(ThemeColor::Border))
        .title(" Bracket ")
        .style(theme.canvas());
    if app.state.bracket.bracket.is_some()
        && let Some(err) = app.state.last_error.as_deref()
    {
        block = block.title_bottom(Line::styled(
            format!(" reload failed: {err} "),
            theme.style(ThemeColor::Error),
        ));
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bracket) = app.state.bracket.bracket.as_ref() else {
        match app.state.last_error.as_deref() {
            Some(err) => draw_message(
                f,
                inner,
                &format!("Bracket load failed:\n{err}"),
                Style::default().fg(Color::Red),
            ),
            None => draw_message(
                f,
                inner,
                "Loading bracket...",
                Style::default().fg(Color::DarkGray),
            ),
        }
        return;
    };

    if app.state.bracket.is_empty() {
        let msg = format!("No bracket data for {}", bracket.league_id);
        draw_message(f, inner, &msg, Style::default().fg(Color::DarkGray));
        return;
    }

    app.state.bracket.set_viewport(inner.width, inner.height);
    let state = &app.state.bracket;
    f.render_widget(
        BracketView {
            sections: &state.sections,
            scroll_x: state.scroll_x,
            scroll_y: state.scroll_y,
            theme: &app.state.theme,
        },
        inner,
    );
}

fn draw_message(f: &mut Frame, area: Rect, msg: &str, style: Style) {
    f.render_widget(
        Paragraph::new(msg)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let key_width = HELP_TEXT.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<key_width$}  "),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan));
    f.render_widget(logger, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
