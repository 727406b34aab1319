use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use rehearsal_room::{FeedbackRecord, Scenario, Session, Speaker, Tone};
use crate::app::{App, FocusPane, FormField, InputMode};

const QUICK_TIPS: [&str; 3] = [
    "Keep it short and specific.",
    "Use an \"I\" statement to own your feelings.",
    "End with a clear ask or next step.",
];

const CHECKLIST: [&str; 3] = [
    "Keep sentences short",
    "Own your feelings using \"I\"",
    "State the desired next step",
];

fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray })
}

/// Centered popup rectangle clamped to the frame
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

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

    let [side_area, main_area] = Layout::horizontal([
        Constraint::Length(36),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_sidebar(app, frame, side_area);
    render_rehearsal(app, frame, main_area);
    render_footer(app, frame, footer_area);

    if app.show_scenario_form {
        render_scenario_form(app, frame, area);
    } else if app.show_mood_picker {
        render_mood_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Life Rehearsal Room ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("practise conversations with AI feedback", Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled("AI Mood: ", Style::default().fg(Color::Gray)),
        Span::styled(app.session.mood.as_str(), Style::default().fg(Color::Yellow).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = if app.show_scenario_form {
        (" NEW SCENARIO ", Style::default().bg(Color::Magenta).fg(Color::White))
    } else if app.show_mood_picker {
        (" MOOD ", Style::default().bg(Color::Magenta).fg(Color::White))
    } else {
        match app.input_mode {
            InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
            InputMode::Editing => (" TYPING ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        }
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [Span::styled(key, key_style), Span::styled(label, label_style)]
    };

    let hints: Vec<Span> = if app.show_scenario_form {
        [hint(" Tab ", " next field "), hint(" Enter ", " add "), hint(" Esc ", " cancel ")].concat()
    } else if app.show_mood_picker {
        [hint(" j/k ", " nav "), hint(" Enter ", " select "), hint(" Esc ", " cancel ")].concat()
    } else if app.input_mode == InputMode::Editing {
        [hint(" Enter ", " send "), hint(" Esc ", " stop typing ")].concat()
    } else {
        let mut hints = match app.focus {
            FocusPane::Scenarios => [hint(" j/k ", " nav "), hint(" Enter ", " select ")].concat(),
            FocusPane::Chat => hint(" j/k ", " scroll ").to_vec(),
            FocusPane::Input => [hint(" Enter ", " type ")].concat(),
        };
        if app.session.active_scenario().has_script() {
            hints.extend(hint(" u ", " use script "));
        }
        hints.extend(
            [
                hint(" Tab ", " focus "),
                hint(" i ", " type "),
                hint(" n ", " new scenario "),
                hint(" m ", " mood "),
                hint(" q ", " quit "),
            ]
            .concat(),
        );
        hints
    };

    let footer_content = Line::from(
        vec![Span::styled(mode_text, mode_style), Span::styled(" ", label_style)]
            .into_iter()
            .chain(hints)
            .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Rows `paragraph` takes when wrapped to `width` columns
fn wrapped_rows(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}

/// Height of a bordered box whose outer width is `width`
fn boxed_height(paragraph: &Paragraph, width: u16) -> u16 {
    wrapped_rows(paragraph, width.saturating_sub(2)).saturating_add(2)
}

/// Tick-marked list shared by the quick tips and the practice checklist
fn checklist_paragraph(items: &'static [&'static str]) -> Paragraph<'static> {
    let lines: Vec<Line> = items
        .iter()
        .map(|item| Line::from(vec![Span::styled("✓ ", Style::default().fg(Color::Green)), Span::raw(*item)]))
        .collect();
    Paragraph::new(lines).wrap(Wrap { trim: true })
}

fn render_sidebar(app: &mut App, frame: &mut Frame, area: Rect) {
    let tips_height = boxed_height(&checklist_paragraph(&QUICK_TIPS), area.width);
    let checklist_height = boxed_height(&checklist_paragraph(&CHECKLIST), area.width);

    let [list_area, tips_area, checklist_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(tips_height),
        Constraint::Length(checklist_height),
    ])
    .areas(area);

    app.scenarios_area = Some(list_area);
    render_scenario_list(app, frame, list_area);

    for (items, title, box_area) in [
        (&QUICK_TIPS, " Quick tips ", tips_area),
        (&CHECKLIST, " Practice checklist ", checklist_area),
    ] {
        let block = Block::default().borders(Borders::ALL).border_style(border_style(false)).title(title);
        frame.render_widget(checklist_paragraph(items).block(block), box_area);
    }
}

fn render_scenario_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Scenarios;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(" Scenario ");

    let active_idx = app.session.active_index();
    let items: Vec<ListItem> = app
        .session
        .scenarios()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if i == active_idx {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} ", s.title)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.scenario_state);
}

fn render_rehearsal(app: &mut App, frame: &mut Frame, area: Rect) {
    // Every panel but the transcript is sized to its wrapped content
    let scenario = app.session.active_scenario();
    let info_height = boxed_height(&scenario_info_paragraph(scenario), area.width);
    let script_height = if scenario.has_script() {
        boxed_height(&script_paragraph(scenario), area.width)
    } else {
        0
    };
    let feedback_height = app
        .session
        .feedback()
        .map(|f| boxed_height(&feedback_paragraph(f), area.width))
        .unwrap_or(0);

    let [info_area, script_area, chat_area, input_area, feedback_area] = Layout::vertical([
        Constraint::Length(info_height),
        Constraint::Length(script_height),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(feedback_height),
    ])
    .areas(area);

    render_scenario_info(app, frame, info_area);
    if script_height > 0 {
        render_script(app, frame, script_area);
    }
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    if feedback_height > 0 {
        render_feedback(app, frame, feedback_area);
    }
}

fn scenario_info_paragraph(scenario: &Scenario) -> Paragraph<'_> {
    let line = Line::from(vec![
        Span::styled(scenario.description.as_str(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled("Scenario ID: ", Style::default().fg(Color::DarkGray)),
        Span::styled(scenario.id.as_str(), Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
    ]);
    Paragraph::new(line).wrap(Wrap { trim: true })
}

fn render_scenario_info(app: &App, frame: &mut Frame, area: Rect) {
    let scenario = app.session.active_scenario();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(false))
        .title(Span::styled(format!(" {} ", scenario.title), Style::default().bold()));

    frame.render_widget(scenario_info_paragraph(scenario).block(block), area);
}

fn script_paragraph(scenario: &Scenario) -> Paragraph<'_> {
    Paragraph::new(scenario.script.as_str())
        .style(Style::default().fg(Color::LightMagenta))
        .wrap(Wrap { trim: true })
}

fn render_script(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Suggested script (u to use) ");

    frame.render_widget(script_paragraph(app.session.active_scenario()).block(block), area);
}

fn transcript_paragraph(session: &Session, pending: bool, animation_frame: u8) -> Paragraph<'_> {
    let chat_text = if session.transcript().is_empty() && !pending {
        Text::from(Span::styled(
            "No rehearsal yet — type your message in the box below and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for turn in session.transcript() {
            let (label, color) = match turn.from {
                Speaker::User => ("You:", Color::Cyan),
                Speaker::Ai => ("AI:", Color::Yellow),
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(turn.text.as_str()));
            lines.push(Line::default());
        }

        if pending {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            let dots = ".".repeat((animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Typing{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    Paragraph::new(chat_text).wrap(Wrap { trim: true })
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == FocusPane::Chat))
        .title(" Rehearsal ");

    let pending = app.replies_pending();
    let chat = transcript_paragraph(&app.session, pending, app.animation_frame);

    app.chat_lines = wrapped_rows(&chat, area.width.saturating_sub(2));
    let max_scroll = app.chat_lines.saturating_sub(app.chat_height);
    if app.chat_follow {
        app.chat_scroll = max_scroll;
    } else {
        app.chat_scroll = app.chat_scroll.min(max_scroll);
    }

    frame.render_widget(chat.block(block).scroll((app.chat_scroll, 0)), area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    app.input_area = Some(area);

    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing || app.focus == FocusPane::Input {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Type your message... ");

    // Horizontal scroll keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.draft_cursor;
    let scroll_offset = if inner_width > 0 && cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .session
        .draft
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);
    frame.render_widget(input, area);

    if editing && !app.show_scenario_form && !app.show_mood_picker {
        // Never past the right border, even when the box has no room at all
        let cursor_x = (cursor_pos - scroll_offset).min(inner_width.saturating_sub(1)) as u16;
        frame.set_cursor_position((
            area.x.saturating_add(1).saturating_add(cursor_x),
            area.y.saturating_add(1),
        ));
    }
}

fn feedback_paragraph(feedback: &FeedbackRecord) -> Paragraph<'_> {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Tone ", label),
            Span::styled(feedback.tone.as_str(), value),
            Span::raw("   "),
            Span::styled("Clarity ", label),
            Span::styled(format!("{}%", feedback.clarity), value),
        ]),
        Line::from(Span::styled("Recommendations", label)),
    ];
    lines.extend(
        feedback
            .recommendations
            .iter()
            .map(|r| Line::from(format!("• {}", r))),
    );

    Paragraph::new(lines).wrap(Wrap { trim: true })
}

fn render_feedback(app: &App, frame: &mut Frame, area: Rect) {
    let Some(feedback) = app.session.feedback() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(Line::from(vec![
            Span::styled(" AI Feedback ", Style::default().bold()),
            Span::styled(format!(" Confidence {}% ", feedback.confidence), Style::default().fg(Color::Green)),
        ]));

    frame.render_widget(feedback_paragraph(feedback).block(block), area);
}

fn render_scenario_form(app: &App, frame: &mut Frame, area: Rect) {
    let popup_area = popup_rect(area, 64, 11);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Add custom scenario ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let fields = [FormField::Title, FormField::Description, FormField::Script];
    for (i, field) in fields.iter().enumerate() {
        let active = *field == app.form_field;
        let y = inner.y + (i as u16) * 3;
        if y + 1 >= inner.y + inner.height {
            break;
        }

        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(field.label()).style(label_style),
            Rect::new(inner.x, y, inner.width, 1),
        );

        // Show the tail of long values so the cursor stays visible
        let width = inner.width.saturating_sub(1) as usize;
        let value = app.form_field_value(*field);
        let char_count = value.chars().count();
        let visible: String = value.chars().skip(char_count.saturating_sub(width)).collect();
        let value_area = Rect::new(inner.x, y + 1, inner.width, 1);
        frame.render_widget(Paragraph::new(visible.as_str()).style(Style::default().fg(Color::Cyan)), value_area);

        if active {
            let cursor_x = visible.chars().count() as u16;
            frame.set_cursor_position((value_area.x + cursor_x, value_area.y));
        }
    }
}

fn render_mood_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let tones = Tone::all();
    let popup_area = popup_rect(area, 30, tones.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" AI Mood ");

    let items: Vec<ListItem> = tones
        .iter()
        .map(|tone| {
            let is_current = *tone == app.session.mood;
            let prefix = if is_current { "* " } else { "  " };
            let style = if is_current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{}{}", prefix, tone)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.mood_picker_state);
}
