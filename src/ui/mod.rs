//! 终端界面
//!
//! ## 设计
//!
//! - 界面循环运行在阻塞线程上，控制器归它所有
//! - 每轮：绘制当前窗口 → 等待按键（带超时）→ 收取调度结果 → 清理过期提示条
//! - 无论循环如何结束（包括 panic），都由 `RestoreGuard` 恢复终端的原始模式和主屏幕

pub mod keymap;
pub mod render;

use crate::controller::MainController;
use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 离开作用域时执行恢复动作，panic 展开时同样生效
struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// 退出原始模式并回到主屏幕
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!("⚠️ 退出原始模式失败: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        warn!("⚠️ 恢复主屏幕失败: {}", e);
    }
}

/// 终端界面
pub struct TuiRenderer {
    controller: MainController,
    tick_rate: Duration,
}

impl TuiRenderer {
    pub fn new(controller: MainController) -> Self {
        let tick_rate = controller.config().tick_rate();
        Self {
            controller,
            tick_rate,
        }
    }

    /// 运行界面直到用户退出
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let _guard = RestoreGuard::new(restore_terminal);

        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        self.event_loop(&mut terminal)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        self.controller.start();

        loop {
            terminal.draw(|f| render::draw(f, self.controller.window()))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    keymap::handle_key(self.controller.window_mut(), key);
                }
            }

            self.controller.tick(Instant::now());

            if self.controller.should_quit() {
                info!("界面循环结束");
                break;
            }
        }

        Ok(())
    }
}
