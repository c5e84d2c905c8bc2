//! Read-eval-render loop.
//!
//! A store subscriber marks the screen dirty on every state change; the
//! loop redraws the whole view after each command when something changed.

use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use todo_core::{render, Todo, TodoClient, TodoListClient, Transport};
use tracing::debug;

use crate::commands::{Command, HELP};

const PROMPT: &str = "todo> ";

pub struct App<T> {
    list: TodoListClient<T>,
    dirty: Rc<Cell<bool>>,
}

impl<T: Transport> App<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        let mut list = TodoListClient::new(client, transport);
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        list.store_mut().subscribe(move |_| flag.set(true));
        Self { list, dirty }
    }

    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        // A failed first load is shown in the view, not fatal.
        if let Err(e) = self.list.load() {
            debug!(%e, "initial load failed");
        }
        self.redraw(out)?;

        for line in input.lines() {
            match Command::parse(&line?) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => writeln!(out, "{HELP}")?,
                Ok(Some(command)) => self.dispatch(command, out)?,
                Err(e) => writeln!(out, "? {e}")?,
            }
            self.redraw(out)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command, out: &mut impl Write) -> io::Result<()> {
        let result = match command {
            // A blank title never becomes the draft.
            Command::Add(title) if title.trim().is_empty() => Ok(()),
            Command::Add(title) => {
                self.list.set_draft(&title);
                self.list.submit_draft().map(drop)
            }
            Command::Toggle(n) => match self.row(n) {
                Some(todo) => self.list.toggle(&todo).map(drop),
                None => return writeln!(out, "? no row {n}"),
            },
            Command::Remove(n) => match self.row(n) {
                Some(todo) => self.list.remove(&todo.id),
                None => return writeln!(out, "? no row {n}"),
            },
            Command::Reload => self.list.load(),
            Command::Help | Command::Quit => Ok(()),
        };
        // Already recorded in the state; the redraw shows it.
        if let Err(e) = result {
            debug!(%e, "command failed");
        }
        Ok(())
    }

    fn row(&self, n: usize) -> Option<Todo> {
        self.list.state().items.get(n.checked_sub(1)?).cloned()
    }

    fn redraw(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.dirty.replace(false) {
            writeln!(out)?;
            write!(out, "{}", render(self.list.state()))?;
        }
        write!(out, "{PROMPT}")?;
        out.flush()
    }
}
