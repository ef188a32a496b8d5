//! Console layout driven by a real contest, checked through the framebuffer

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use tetcon::engine::{ContestView, Entry, GameControl, RuleConfig, ViewConfig};
use tetcon::term::{ContestScreen, TILE_SIZE};

#[derive(Debug, Clone)]
struct Frame {
    round: u32,
    wiping: bool,
    top: String,
    pieces: u32,
}

/// Renders like the console view, but keeps the frames instead of printing.
struct Recorder {
    screen: ContestScreen,
    frames: Rc<RefCell<Vec<Frame>>>,
    quit_after: Option<usize>,
}

impl ContestView for Recorder {
    fn round_started(&mut self, _round: u32) {
        self.screen.start_round_effect();
    }

    fn is_animating(&self) -> bool {
        self.screen.is_animating()
    }

    fn draw(&mut self, round: u32, entries: &[Entry<'_>]) -> Result<()> {
        let wiping = self.screen.is_animating();
        self.screen.render(round, entries);
        self.frames.borrow_mut().push(Frame {
            round,
            wiping,
            top: self.screen.framebuffer().row_text(0),
            pieces: entries[0].score().pieces(),
        });
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit_after
            .is_some_and(|n| self.frames.borrow().len() >= n)
    }
}

fn recorded(rule: &str, quit_after: Option<usize>) -> (Vec<String>, Vec<Frame>) {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let view = ViewConfig::default();
    let recorder = Recorder {
        screen: ContestScreen::from_config(&view),
        frames: Rc::clone(&frames),
        quit_after,
    };
    let mut gc = GameControl::new(RuleConfig::parse(rule).unwrap(), view)
        .with_seed(3)
        .quiet(true)
        .with_view(Box::new(recorder));
    gc.add_player("idle").unwrap();
    let reports = gc.run().unwrap();
    drop(gc);
    let frames = frames.borrow().clone();
    (reports, frames)
}

#[test]
fn test_each_round_opens_with_a_wipe() {
    let (reports, frames) = recorded("RULE=LONGRUN&W=10&H=8&G=10&R=2", None);
    assert_eq!(reports.len(), 2);

    for round in 1..=2 {
        let of_round: Vec<&Frame> = frames.iter().filter(|f| f.round == round).collect();
        let wipe = (1 + 2 * TILE_SIZE) as usize;
        assert!(of_round[..wipe].iter().all(|f| f.wiping));
        assert!(of_round[..wipe].iter().all(|f| f.pieces == 0));
        assert_eq!(of_round[0].top, "#".repeat(79));

        let after = of_round[wipe];
        assert!(!after.wiping);
        assert!(after.top.contains(&format!("ROUND {:03}", round)), "{}", after.top);
        assert!(of_round.last().map_or(0, |f| f.pieces) > 0);
    }
}

#[test]
fn test_viewer_can_stop_the_contest() {
    let (reports, frames) = recorded("RULE=LONGRUN&W=10&H=8&G=10&R=3", Some(20));
    assert!(reports.is_empty());
    assert_eq!(frames.len(), 20);
}
