// Help bar widget: keyboard hints for the current tab or input mode.

use hrpro_core::protocol::TabId;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(help_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Key hints for what the user can do right now.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        return " y:quit  n/Esc:cancel";
    }
    match state.input_mode {
        InputMode::AddNames => return " type or paste names, one per line  Enter:add  Esc:cancel",
        InputMode::ImportPath => return " path to a .csv or .txt file  Enter:import  Esc:cancel",
        InputMode::Normal => {}
    }
    match state.active_tab {
        TabId::List => {
            " a:add  i:import  x:remove  d:dedupe  m:sample  C:clear  j/k:select  1-3:tabs  q:quit"
        }
        TabId::Draw => " Space:draw  R:reset  t:repeat mode  j/k:scroll  1-3:tabs  q:quit",
        TabId::Groups => {
            " g:group  +/-:size  n:team names  e:export csv  j/k:scroll  1-3:tabs  q:quit"
        }
    }
}
