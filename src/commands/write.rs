use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::llm::{LlmError, ensure_api_key, generate_post};
use crate::palette::Palette;
use crate::post::Post;
use crate::tui::Theme;

pub async fn run(topic: &str, model: &str, plain: bool) -> Result<()> {
    let api_key = ensure_api_key()?;

    println!(
        "{} {}",
        Palette::paint(Palette::BRAND, "rednote"),
        Palette::dim("is writing, hang tight…")
    );

    let post = match generate_post(topic, &api_key, model).await {
        Ok(post) => post,
        Err(err @ LlmError::Transport(_)) => {
            return Err(err).context("Generation failed. Check your API key or retry later.");
        }
        Err(err) => return Err(err.into()),
    };

    if plain {
        render_plain(topic, &post);
    } else {
        render_view(topic, &post)?;
    }

    Ok(())
}

fn render_plain(topic: &str, post: &Post) {
    println!(
        "{} {}",
        Palette::paint(Palette::BRAND, "小红书"),
        Palette::dim(topic)
    );
    println!();
    println!("{}", Palette::paint(Palette::INFO, "📝 标题"));
    for (i, title) in post.titles.iter().enumerate() {
        println!("{} {}", Palette::dim(format!("{}.", i + 1)), title);
    }
    println!();
    println!("{}", Palette::paint(Palette::INFO, "📄 正文"));
    println!("{}", post.content);
}

fn render_view(topic: &str, post: &Post) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let draw_result = view_loop(&mut terminal, topic, post);

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    draw_result
}

fn view_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    topic: &str,
    post: &Post,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_post(frame, topic, post))?;

        if event::poll(Duration::from_millis(200))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw_post(frame: &mut Frame, topic: &str, post: &Post) {
    let area = frame.area();
    frame.render_widget(Theme::backdrop(), area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let mut title_lines: Vec<Line> = Vec::new();
    for (i, title) in post.titles.iter().enumerate() {
        title_lines.push(Line::from(vec![
            Span::styled(format!("标题{} ", i + 1), Theme::label()),
            Theme::span(title.clone()),
        ]));
        title_lines.push(Line::default());
    }
    let titles_widget = Paragraph::new(title_lines)
        .block(Theme::panel("📝 小红书标题"))
        .wrap(Wrap { trim: false });
    frame.render_widget(titles_widget, columns[0]);

    let content_widget = Paragraph::new(post.content.as_str())
        .block(Theme::panel(format!("📄 小红书正文 · {topic}")))
        .wrap(Wrap { trim: false });
    frame.render_widget(content_widget, columns[1]);

    let help = Line::from(vec![
        Theme::key_chip("q"),
        Theme::span(" / "),
        Theme::key_chip("Esc"),
        Theme::dim_span(" close"),
    ]);
    frame.render_widget(Paragraph::new(help), rows[1]);
}
