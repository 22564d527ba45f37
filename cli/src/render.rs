use sweeper_core::{CellView, GameSession, SessionState};

pub fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

fn face(state: SessionState) -> &'static str {
    match state {
        SessionState::NotStarted | SessionState::Playing => ":)",
        SessionState::Won => "B)",
        SessionState::Lost => "X(",
    }
}

fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Guessed => '?',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::TriggeredMine => '@',
        CellView::Mine => '*',
        CellView::Misflagged => 'X',
    }
}

/// Counter line plus the board with column and row labels, x across and y down.
pub fn render_board(session: &GameSession) -> sweeper_core::Result<String> {
    let (width, height) = session.grid().size();

    let mut out = format!(
        "{}  {}  {}\n   ",
        format_for_counter(session.remaining_mines()),
        face(session.state()),
        format_for_counter(i32::from(session.elapsed_secs()))
    );
    for x in 0..width {
        out.push_str(&format!("{x:>3}"));
    }
    out.push('\n');

    for y in 0..height {
        out.push_str(&format!("{y:>3}"));
        for x in 0..width {
            out.push_str(&format!("{:>3}", glyph(session.cell_view((x, y))?)));
        }
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{FlagPolicy, MineLayout};

    #[test]
    fn counter_formatting() {
        assert_eq!(format_for_counter(-150), "-99");
        assert_eq!(format_for_counter(-5), "-05");
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(42), "042");
        assert_eq!(format_for_counter(1234), "999");
    }

    #[test]
    fn renders_lost_board() {
        let layout = MineLayout::from_mine_coords((3, 2), &[(0, 0), (2, 1)]).unwrap();
        let mut session = GameSession::with_layout(layout, FlagPolicy::Binary, 0).unwrap();
        session.reveal((1, 0), &mut ()).unwrap();
        session.toggle_flag((0, 1), &mut ()).unwrap();
        session.reveal((2, 1), &mut ()).unwrap();

        let board = render_board(&session).unwrap();

        assert_eq!(
            board,
            "001  X(  000\n     0  1  2\n  0  *  2  #\n  1  X  #  @\n"
        );
    }

    #[test]
    fn renders_fresh_board() {
        let layout = MineLayout::from_mine_coords((2, 1), &[(1, 0)]).unwrap();
        let session = GameSession::with_layout(layout, FlagPolicy::Binary, 0).unwrap();

        let board = render_board(&session).unwrap();

        assert_eq!(board, "001  :)  000\n     0  1\n  0  #  #\n");
    }
}
