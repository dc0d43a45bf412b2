use std::io::{self, Write};

use crossterm::{
    queue,
    style::{self, Stylize},
};

use crate::{infection::InfectionState, path::Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Route,
    Infected,
    Plain,
}

impl Marker {
    fn symbol(&self) -> char {
        match self {
            Marker::Route => 'x',
            Marker::Infected => 'o',
            Marker::Plain => ' ',
        }
    }
}

/// Text picture of the grid, one boxed cell per grid cell.
///
/// Route cells are marked with a green `x`, infected cells with a red `o`.
pub struct GridView<'a> {
    state: &'a InfectionState,
    route: Option<&'a Route>,
    generation: usize,
    colored: bool,
}

impl<'a> GridView<'a> {
    pub fn new(state: &'a InfectionState, generation: usize) -> Self {
        Self {
            state,
            route: None,
            generation,
            colored: true,
        }
    }

    pub fn with_route(mut self, route: &'a Route) -> Self {
        self.route = Some(route);
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let grid = self.state.grid();
        // Row labels are right aligned, cells widen to fit the widest column label.
        let label_w = digits_n(grid.row_n() - 1);
        let cell_w = (digits_n(grid.col_n() - 1) + 2).max(3);
        let margin = " ".repeat(label_w + 1);
        let separator = format!(
            "{}{}+",
            margin,
            format!("+{}", "-".repeat(cell_w)).repeat(grid.col_n())
        );
        let header = (0..grid.col_n())
            .map(|c| format!(" {:^w$}", c, w = cell_w))
            .collect::<String>();
        writeln!(out, "{}{}", margin, header)?;
        let left_pad = " ".repeat((cell_w - 1) / 2);
        let right_pad = " ".repeat(cell_w - 1 - (cell_w - 1) / 2);
        for r in 0..grid.row_n() {
            writeln!(out, "{}", separator)?;
            write!(out, "{:>w$} ", r, w = label_w)?;
            for c in 0..grid.col_n() {
                write!(out, "|{}", left_pad)?;
                self.render_marker(out, self.marker(r * grid.col_n() + c))?;
                write!(out, "{}", right_pad)?;
            }
            writeln!(out, "|")?;
        }
        writeln!(out, "{}", separator)?;
        writeln!(out, "generation: {}", self.generation)?;

        out.flush()
    }

    fn marker(&self, id: usize) -> Marker {
        if self.route.is_some_and(|route| route.contains(id)) {
            Marker::Route
        } else if self.state.is_infected(id) {
            Marker::Infected
        } else {
            Marker::Plain
        }
    }

    fn render_marker<W: Write>(&self, out: &mut W, marker: Marker) -> io::Result<()> {
        let symbol = marker.symbol();
        if !self.colored || marker == Marker::Plain {
            return queue!(out, style::Print(symbol));
        }

        let styled = match marker {
            Marker::Route => style::style(symbol).green().bold(),
            _ => style::style(symbol).red().bold(),
        };
        queue!(out, style::PrintStyledContent(styled))
    }
}

fn digits_n(n: usize) -> usize {
    n.to_string().len()
}
