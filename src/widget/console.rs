use std::io::Write;

use super::provider::{RenderError, WidgetHost};
use super::view::{WidgetInstanceId, WidgetView};

/// Host that draws each instance as one line on a writer (stdout for the
/// CLI).
pub struct ConsoleHost<W> {
    instances: Vec<WidgetInstanceId>,
    out: W,
}

impl<W: Write + Send> ConsoleHost<W> {
    pub fn new(instances: &[u32], out: W) -> Self {
        Self {
            instances: instances.iter().copied().map(WidgetInstanceId).collect(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> WidgetHost for ConsoleHost<W> {
    fn instance_ids(&self) -> Vec<WidgetInstanceId> {
        self.instances.clone()
    }

    fn render(&mut self, view: &WidgetView) -> Result<(), RenderError> {
        let [plus, minus] = view.bindings;
        writeln!(
            self.out,
            "[widget {}] count: {}  [+] {}#{}  [-] {}#{}",
            view.instance,
            view.text(),
            plus.action.action_id(),
            plus.request_code,
            minus.action.action_id(),
            minus.request_code,
        )
        .map_err(|e| RenderError::Failed {
            instance: view.instance,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CounterValue;

    #[test]
    fn renders_one_line_per_view() {
        let mut host = ConsoleHost::new(&[7], Vec::new());
        let view = WidgetView::build(WidgetInstanceId(7), CounterValue::new(3));
        host.render(&view).unwrap();

        let out = String::from_utf8(host.into_inner()).unwrap();
        assert_eq!(
            out,
            "[widget 7] count: 3  [+] ACTION_INCREMENT#14  [-] ACTION_DECREMENT#15\n"
        );
    }
}
