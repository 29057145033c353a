use kundali_core::{DashaPeriod, KundaliPayload, Route, Sender};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::screens::{
    ChatScreen, FetchKind, FetchScreen, FetchState, HomeField, HomeScreen, ScreenState,
};

const APP_NAME: &str = " AstroGo Kundali ";
const BOT_NAME: &str = "AstroGo";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let animation_frame = app.animation_frame;
    match app.current_mut() {
        ScreenState::Home(home) => render_home(home, frame, body_area),
        ScreenState::Fetch(fetch) => render_fetch(fetch, animation_frame, frame, body_area),
        ScreenState::Chat(chat) => render_chat(chat, animation_frame, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(APP_NAME, Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ];

    let breadcrumb = app.breadcrumb();
    let last = breadcrumb.len().saturating_sub(1);
    for (i, route) in breadcrumb.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::Gray)));
        }
        let style = if i == last {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(route.title(), style));
    }

    spans.push(Span::styled(
        format!("  [{}]", app.service_url),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &mut App, frame: &mut Frame, area: Rect) {
    let route = app.current_route();
    let mode_text = match route {
        Route::Home => " INPUT ",
        Route::Kundali | Route::Planets | Route::Dasha => " KUNDALI ",
        Route::Chatbot => " CHAT ",
    };
    let mode_style = match route {
        Route::Chatbot | Route::Home => Style::default().bg(Color::Yellow).fg(Color::Black),
        _ => Style::default().bg(Color::Blue).fg(Color::White),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {} ", key), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match app.current_mut() {
        ScreenState::Home(_) => {
            hints.extend(hint("Tab", "next field"));
            hints.extend(hint("Enter", "calculate"));
            hints.extend(hint("Esc", "quit"));
        }
        ScreenState::Fetch(fetch) => {
            hints.extend(hint("j/k", "scroll"));
            match fetch.state {
                FetchState::Loaded(_) => hints.extend(hint("Enter", fetch.kind.forward_label())),
                FetchState::Failed(_) => hints.extend(hint("r", "retry")),
                FetchState::Idle | FetchState::Loading => {}
            }
            hints.extend(hint("Esc", "back"));
            hints.extend(hint("q", "quit"));
        }
        ScreenState::Chat(_) => {
            hints.extend(hint("Enter", "send"));
            hints.extend(hint("↑/↓", "scroll"));
            hints.extend(hint("Esc", "back"));
            hints.extend(hint("Ctrl-C", "quit"));
        }
    }

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_home(home: &HomeScreen, frame: &mut Frame, area: Rect) {
    let [title_area, date_area, time_area, place_area, button_area, _] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Enter your birth details",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, title_area);

    for (field, field_area) in HomeField::ALL.into_iter().zip([date_area, time_area, place_area]) {
        let focused = home.focus == field;
        let border_color = if focused { Color::Yellow } else { Color::DarkGray };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", field.label()));

        // Inner width = total width - 2 (for borders)
        let inner_width = field_area.width.saturating_sub(2) as usize;
        let (visible_text, cursor_x) = home.field(field).visible(inner_width);

        let input = Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(block);
        frame.render_widget(input, field_area);

        if focused {
            frame.set_cursor_position((field_area.x + cursor_x as u16 + 1, field_area.y + 1));
        }
    }

    let button = Paragraph::new(Line::from(vec![
        Span::styled(" Enter ", Style::default().bg(Color::DarkGray).fg(Color::White)),
        Span::styled(
            " Calculate Kundali ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(button, button_area);
}

fn render_fetch(fetch: &mut FetchScreen, animation_frame: u8, frame: &mut Frame, area: Rect) {
    let [content_area, action_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", fetch.kind.route().title()));

    let lines = match &fetch.state {
        FetchState::Idle | FetchState::Loading => {
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat(animation_frame as usize + 1);
            vec![Line::from(Span::styled(
                format!("{}{}", fetch.kind.loading_label(), dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))]
        }
        FetchState::Failed(reason) => failed_lines(reason),
        FetchState::Loaded(payload) => match fetch.kind {
            FetchKind::Positions => position_lines(payload),
            FetchKind::Houses => house_lines(payload),
            FetchKind::Dasha => dasha_lines(payload),
        },
    };

    let content = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    fetch.fit_to_view(
        content.line_count(content_area.width.saturating_sub(2)),
        content_area.height.saturating_sub(2),
    );
    let content = content.block(block).scroll((fetch.scroll, 0));
    frame.render_widget(content, content_area);

    if matches!(fetch.state, FetchState::Loaded(_)) {
        let action = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::styled(
                format!(" {} ", fetch.kind.forward_label()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(action, action_area);
    }
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}: ", label), Style::default().fg(Color::Gray)),
        Span::raw(value.to_string()),
    ])
}

fn failed_lines(reason: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Could not load kundali data",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(reason.to_string()),
        Line::default(),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("r", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" to retry"),
        ]),
    ]
}

fn position_lines(payload: &KundaliPayload) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let ascendant = payload.ascendant();
    if !ascendant.is_empty() {
        for (label, value) in &ascendant {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
                Span::styled(value.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]));
        }
        lines.push(Line::default());
    }

    match payload.planetary_positions() {
        Ok(positions) => {
            lines.extend(positions.iter().map(|position| Line::from(position.line())));
        }
        Err(e) => lines.extend(failed_lines(&e.to_string())),
    }
    lines
}

fn house_lines(payload: &KundaliPayload) -> Vec<Line<'static>> {
    let placements = match payload.house_placements() {
        Ok(placements) => placements,
        Err(e) => return failed_lines(&e.to_string()),
    };

    let mut lines = Vec::new();
    for placement in &placements {
        lines.push(Line::from(Span::styled(
            placement.planet.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for (label, value) in placement.fields() {
            lines.push(labelled(label, value));
        }
        lines.push(Line::default());
    }
    lines
}

fn dasha_lines(payload: &KundaliPayload) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let sections = [
        ("Current Mahadasha", payload.current_dasha(), "No Mahadasha Data Available"),
        ("Current Antardasha", payload.current_antardasha(), "No Antardasha Data Available"),
    ];

    for (title, period, placeholder) in sections {
        lines.push(section_title(title));
        match period {
            DashaPeriod::Missing => lines.push(Line::from(Span::styled(
                format!("  {}", placeholder),
                Style::default().fg(Color::DarkGray),
            ))),
            DashaPeriod::Note(text) => lines.push(Line::from(format!("  {}", text))),
            DashaPeriod::Period {
                planet,
                start_date,
                end_date,
            } => {
                lines.push(labelled("Planet", &planet));
                lines.push(labelled("Start Date", &start_date));
                lines.push(labelled("End Date", &end_date));
            }
        }
        lines.push(Line::default());
    }
    lines
}

/// The chat transcript, wrapped the way it is drawn. Scroll limits are
/// measured on this same paragraph.
pub fn chat_transcript(chat: &ChatScreen, animation_frame: u8) -> Paragraph<'_> {
    let user_style = Style::default().fg(Color::Cyan);
    let bot_style = Style::default().fg(Color::Yellow);

    let mut lines: Vec<Line> = Vec::new();
    for msg in &chat.messages {
        let (name, style, alignment) = match msg.sender {
            Sender::User => ("You", user_style, Alignment::Right),
            Sender::Bot => (BOT_NAME, bot_style, Alignment::Left),
        };
        lines.push(
            Line::from(Span::styled(name, style.add_modifier(Modifier::BOLD))).alignment(alignment),
        );
        for text in msg.text.lines() {
            lines.push(Line::from(Span::styled(text, style)).alignment(alignment));
        }
        lines.push(Line::default());
    }

    if chat.is_pending() {
        lines.push(Line::from(Span::styled(BOT_NAME, bot_style.add_modifier(Modifier::BOLD))));
        let dots = ".".repeat(animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true })
}

fn render_chat(chat: &mut ChatScreen, animation_frame: u8, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    // Inner size minus borders
    chat.fit_to_view(chat_area.width.saturating_sub(2), chat_area.height.saturating_sub(2));

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Predictions for {} ", chat.query.place_of_birth));

    let transcript = chat_transcript(chat, animation_frame)
        .block(chat_block)
        .scroll((chat.scroll, 0));
    frame.render_widget(transcript, chat_area);

    let (title, border_color) = match &chat.last_error {
        Some(reason) => (format!(" No reply: {} ", reason), Color::Red),
        None => (" Ask about your Kundali ".to_string(), Color::Yellow),
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = input_area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = chat.input.visible(inner_width);
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    frame.set_cursor_position((input_area.x + cursor_x as u16 + 1, input_area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        buffer_contains, buffer_lines, render_to_buffer, sample_kundali, settle_app, FakeService,
    };
    use kundali_core::{BirthQuery, ChatMessage, RouteParams};
    use serde_json::{json, Value};

    const WIDTH: u16 = 80;
    const HEIGHT: u16 = 30;

    fn draw(app: &mut App) -> Vec<String> {
        let buffer = render_to_buffer(WIDTH, HEIGHT, |frame| render(app, frame));
        buffer_lines(&buffer)
    }

    fn draw_sized(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let buffer = render_to_buffer(width, height, |frame| render(app, frame));
        buffer_lines(&buffer)
    }

    fn delhi() -> RouteParams {
        RouteParams::from_query(&BirthQuery::new("1990-05-10", "14:30", "Delhi"))
    }

    async fn app_on(route: Route, kundali: Value) -> App {
        let service = FakeService::new(kundali);
        let mut app = App::new(service, "http://test");
        app.navigate(route, delhi());
        settle_app(&mut app).await;
        app
    }

    fn count(lines: &[String], needle: &str) -> usize {
        lines.iter().filter(|line| line.contains(needle)).count()
    }

    #[test]
    fn test_home_shows_labels_and_typed_values() {
        let service = FakeService::new(sample_kundali());
        let mut app = App::new(service, "http://test");
        let home = app.home_mut().unwrap();
        "1990-05-10".chars().for_each(|c| home.focused_mut().insert(c));

        let lines = draw(&mut app);
        for field in HomeField::ALL {
            assert_eq!(count(&lines, field.label()), 1, "{}", field.label());
        }
        assert_eq!(count(&lines, "1990-05-10"), 1);
        assert_eq!(count(&lines, "Calculate Kundali"), 1);
        assert_eq!(count(&lines, "[http://test]"), 1);
    }

    #[tokio::test]
    async fn test_positions_renders_one_block_per_planet() {
        let kundali = json!({
            "planetary_info": { "Sun": { "Position": "10°", "Sign": "Aries" } },
            "planets_info": {
                "Sun": { "House": 9, "House Ruler": "Mars", "Strength": "Exalted", "Nature": "Malefic", "Sign": "Aries" }
            }
        });
        let mut app = app_on(Route::Kundali, kundali).await;

        let lines = draw(&mut app);
        assert_eq!(count(&lines, "Sun: 10° in Aries"), 1);
        assert_eq!(count(&lines, "° in "), 1);
        assert_eq!(count(&lines, "Next"), 2, "forward button and footer hint");
    }

    #[tokio::test]
    async fn test_positions_blocks_match_planetary_info_keys() {
        let mut app = app_on(Route::Kundali, sample_kundali()).await;
        let lines = draw(&mut app);

        let keys: Vec<String> = sample_kundali()["planetary_info"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        for key in &keys {
            assert_eq!(count(&lines, &format!("{}: ", key)), 1, "{}", key);
        }
        assert_eq!(count(&lines, "° in "), keys.len());
        assert_eq!(count(&lines, "Ascendant Sign: Leo (12.34°)"), 1);

        // Server order is kept
        let sun = lines.iter().position(|l| l.contains("Sun: 10° in Aries")).unwrap();
        let moon = lines.iter().position(|l| l.contains("Moon: 200.50° in Libra")).unwrap();
        assert!(sun < moon);
    }

    #[tokio::test]
    async fn test_houses_renders_a_card_per_planet() {
        let mut app = app_on(Route::Planets, sample_kundali()).await;
        let lines = draw(&mut app);

        assert_eq!(count(&lines, "House Ruler: "), 2);
        assert_eq!(count(&lines, "House: 9"), 1);
        assert_eq!(count(&lines, "Strength: Exalted"), 1);
        assert_eq!(count(&lines, "Nature: Benefic"), 1);
        assert_eq!(count(&lines, "Sign: Libra"), 1);
    }

    #[tokio::test]
    async fn test_dasha_renders_string_verbatim_and_object_as_fields() {
        let kundali = json!({
            "current_dasha": "No Mahadasha Data Available",
            "current_antardasha": { "Planet": "Moon", "Start Date": "2020-01-01", "End Date": "2026-01-01" }
        });
        let mut app = app_on(Route::Dasha, kundali).await;
        let lines = draw(&mut app);

        let mahadasha = lines.iter().position(|l| l.contains("Current Mahadasha")).unwrap();
        let antardasha = lines.iter().position(|l| l.contains("Current Antardasha")).unwrap();
        assert!(lines[mahadasha + 1].contains("No Mahadasha Data Available"));
        assert!(lines[antardasha + 1].contains("Planet: Moon"));
        assert!(lines[antardasha + 2].contains("Start Date: 2020-01-01"));
        assert!(lines[antardasha + 3].contains("End Date: 2026-01-01"));
        assert_eq!(count(&lines, "Get Predictions"), 2, "forward button and footer hint");
    }

    #[tokio::test]
    async fn test_dasha_placeholders_for_null_and_absent() {
        let mut app = app_on(Route::Dasha, json!({ "current_dasha": null })).await;
        let lines = draw(&mut app);
        assert_eq!(count(&lines, "No Mahadasha Data Available"), 1);
        assert_eq!(count(&lines, "No Antardasha Data Available"), 1);
    }

    #[tokio::test]
    async fn test_loading_view_then_failed_view() {
        let service = FakeService::failing();
        let mut app = App::new(service, "http://test");
        app.navigate(Route::Planets, delhi());

        let lines = draw(&mut app);
        assert_eq!(count(&lines, "Loading Planetary Info."), 1);
        assert_eq!(count(&lines, "Enter"), 0);

        settle_app(&mut app).await;
        let lines = draw(&mut app);
        assert_eq!(count(&lines, "Could not load kundali data"), 1);
        assert_eq!(count(&lines, "503"), 1);
        assert_eq!(count(&lines, "r to retry"), 1);
    }

    #[tokio::test]
    async fn test_header_breadcrumb_follows_stack() {
        let mut app = app_on(Route::Kundali, sample_kundali()).await;
        let buffer = render_to_buffer(WIDTH, HEIGHT, |frame| render(&mut app, frame));
        assert!(buffer_contains(&buffer, "Birth Details > Planetary Positions"));
    }

    #[tokio::test]
    async fn test_chat_aligns_user_right_and_bot_left() {
        let service = FakeService::new(sample_kundali());
        let mut app = App::new(service, "http://test");
        app.navigate(Route::Chatbot, delhi());
        let chat = app.chat_mut().unwrap();
        chat.messages.push(ChatMessage::user("Hi"));
        chat.messages.push(ChatMessage::bot("Hello there"));

        let lines = draw(&mut app);
        let border = |c: char| c == '│' || c == ' ';

        let you = lines.iter().find(|l| l.contains("You")).unwrap();
        assert!(you.trim_end_matches(border).ends_with("You"));
        let hi = lines.iter().find(|l| l.contains("Hi")).unwrap();
        assert!(hi.trim_end_matches(border).ends_with("Hi"));

        let reply = lines.iter().find(|l| l.contains("Hello there")).unwrap();
        assert!(reply.trim_start_matches(border).starts_with("Hello there"));
        assert_eq!(count(&lines, "Predictions for Delhi"), 1);
    }

    #[tokio::test]
    async fn test_chat_shows_thinking_and_failure_reason() {
        let service = FakeService::failing().hold_chat();
        let mut app = App::new(service.clone(), "http://test");
        app.navigate(Route::Chatbot, delhi());
        let chat = app.chat_mut().unwrap();
        "Hello".chars().for_each(|c| chat.input.insert(c));
        chat.send_message();

        let lines = draw(&mut app);
        assert_eq!(count(&lines, "Thinking."), 1);

        service.release_chat();
        settle_app(&mut app).await;
        let lines = draw(&mut app);
        assert_eq!(count(&lines, "Thinking"), 0);
        assert_eq!(count(&lines, "No reply:"), 1);
        assert_eq!(count(&lines, "Hello"), 1);
    }

    fn long_reply() -> String {
        (1..=12)
            .map(|i| format!("word{:02}xxxxxxxxx", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn test_long_reply_is_fully_reachable_at_bottom() {
        let service = FakeService::new(sample_kundali());
        let mut app = App::new(service, "http://test");
        app.navigate(Route::Chatbot, delhi());
        let chat = app.chat_mut().unwrap();
        chat.messages.push(ChatMessage::bot(long_reply()));
        chat.scroll_to_bottom();

        let buffer = render_to_buffer(30, 14, |frame| render(&mut app, frame));
        assert!(buffer_contains(&buffer, "word12xxxxxxxxx"));

        // Manual scrolling reaches the same bottom
        let chat = app.chat_mut().unwrap();
        chat.scroll_up(100);
        chat.scroll_down(1000);
        let buffer = render_to_buffer(30, 14, |frame| render(&mut app, frame));
        assert!(buffer_contains(&buffer, "word12xxxxxxxxx"));
        assert!(!buffer_contains(&buffer, "word01xxxxxxxxx"));
    }

    #[tokio::test]
    async fn test_reply_arriving_after_render_scrolls_into_view() {
        let service = FakeService::new(sample_kundali());
        let mut app = App::new(service, "http://test");
        app.navigate(Route::Chatbot, delhi());
        let lines = draw_sized(&mut app, 30, 14);
        assert_eq!(count(&lines, "word12"), 0);

        let chat = app.chat_mut().unwrap();
        chat.input.insert('?');
        chat.send_message();
        settle_app(&mut app).await;
        app.chat_mut().unwrap().messages.push(ChatMessage::bot(long_reply()));
        app.chat_mut().unwrap().scroll_to_bottom();

        let lines = draw_sized(&mut app, 30, 14);
        assert_eq!(count(&lines, "word12xxxxxxxxx"), 1);
    }

    #[tokio::test]
    async fn test_fetch_scroll_stops_at_content_end() {
        let mut app = app_on(Route::Planets, sample_kundali()).await;
        // Two 7-row cards in a 7-row view
        let lines = draw_sized(&mut app, 40, 12);
        assert_eq!(count(&lines, "House Ruler: Mars"), 1);

        app.fetch_mut().unwrap().scroll_down(1000);
        let lines = draw_sized(&mut app, 40, 12);
        assert_eq!(app.fetch_mut().unwrap().scroll, 14 - 7);
        assert_eq!(count(&lines, "Sign: Libra"), 1);
    }
}
