//! Output scope with the voice's play region drawn underneath

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use rompler_dsp::{voice::Region, Params, VoiceStatus};

/// Render the scope and, below it, where the cursor sits in the slice
pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    audio_buffer: &[f32],
    params: &Params,
    status: Option<&VoiceStatus>,
    slice_len: usize,
) {
    let block = Block::default().title(" Output ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    // one point per column is all the chart can show
    let step = audio_buffer.len().div_ceil(rows[0].width.max(1) as usize).max(1);
    let len = audio_buffer.len().max(1) as f64;
    let data: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, &sample)| (i as f64 / len, sample as f64))
        .collect();

    let color = match status {
        Some(s) if s.buffer_status.is_playing() => Color::Cyan,
        _ => Color::DarkGray,
    };
    let chart = Chart::new(vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)])
    .x_axis(Axis::default().bounds([0.0, 1.0]))
    .y_axis(Axis::default().bounds([-1.0, 1.0]));
    frame.render_widget(chart, rows[0]);

    let strip = region_strip(rows[1].width as usize, params, status, slice_len);
    frame.render_widget(Paragraph::new(strip), rows[1]);
}

/// One character per column: `·` outside the play region, `─` before the
/// loop marker, `═` inside the loop section and `●` at the read cursor.
fn region_strip(
    width: usize,
    params: &Params,
    status: Option<&VoiceStatus>,
    slice_len: usize,
) -> Line<'static> {
    let Some(region) = Region::compute(slice_len, params.start, params.length, params.loop_marker)
    else {
        return Line::from(Span::styled(
            " empty play region",
            Style::default().fg(Color::DarkGray),
        ));
    };
    if width == 0 {
        return Line::default();
    }

    let column = |pos: usize| (pos * width / slice_len).min(width - 1);
    let cursor = status
        .filter(|s| s.buffer_status.is_playing())
        .map(|s| column(s.read_pos));

    let spans = (0..width)
        .map(|c| {
            let pos = c * slice_len / width;
            if Some(c) == cursor {
                Span::styled("●", Style::default().fg(Color::LightGreen))
            } else if pos < region.start || pos >= region.end {
                Span::styled("·", Style::default().fg(Color::DarkGray))
            } else if params.looping && pos >= region.loop_pos {
                Span::styled("═", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("─", Style::default().fg(Color::White))
            }
        })
        .collect::<Vec<_>>();

    Line::from(spans)
}
