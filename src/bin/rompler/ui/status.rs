//! Status and parameter panels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use rompler_dsp::{dsp::pitch::cutoff_to_hz, BufferStatus, Params, VoiceStatus};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Render the voice status bar
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    status: Option<&VoiceStatus>,
    read_failures: u64,
    sample_rate: f32,
    stats: &AudioStats,
) {
    let block = Block::default().title(" rompler ").borders(Borders::ALL);

    let mut spans = match status {
        Some(status) => {
            let playing = status.buffer_status.is_playing();
            let (symbol, color) = match status.buffer_status {
                BufferStatus::Stopped => ("■", Color::DarkGray),
                BufferStatus::ReadFirst => ("▶", Color::LightGreen),
                BufferStatus::Running => ("▶", Color::Green),
                BufferStatus::ReadLast => ("▶", Color::Yellow),
            };
            vec![
                Span::styled(
                    format!(" {} {:?}  ", symbol, status.buffer_status),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("Slice {}  ", status.slice),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:?}  ", status.direction),
                    Style::default().fg(if playing { Color::White } else { Color::DarkGray }),
                ),
                Span::styled(
                    format!("pos {} + {:.2}  inc {:.3}  ", status.read_pos, status.phase, status.increment),
                    Style::default().fg(Color::DarkGray),
                ),
            ]
        }
        None => vec![Span::styled(
            " waiting for audio  ",
            Style::default().fg(Color::DarkGray),
        )],
    };

    if read_failures > 0 {
        spans.push(Span::styled(
            format!("{} failed reads  ", read_failures),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        format!("{:.1}kHz  ", sample_rate / 1000.0),
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

/// Render the parameter summary
pub fn render_params(frame: &mut Frame, area: Rect, params: &Params) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let gate_color = if params.gate { Color::Green } else { Color::DarkGray };
    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" gate {}  ", on_off(params.gate)), Style::default().fg(gate_color)),
            Span::raw(format!(
                "slice {}  speed {:+.2}  pitch {:+.0} st  ",
                params.slice, params.speed, params.pitch
            )),
            Span::raw(format!(
                "loop {}  ping-pong {}  marker {:.2}",
                on_off(params.looping),
                on_off(params.ping_pong),
                params.loop_marker
            )),
        ]),
        Line::from(vec![
            Span::raw(format!(
                " filter {:?} {:.0} Hz  ",
                params.filter_type,
                cutoff_to_hz(params.cutoff)
            )),
            Span::raw(format!(
                "slice lock {}  eg sync {}",
                on_off(params.slice_lock),
                on_off(params.eg_sync)
            )),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
