use crate::{add_one, Hits, Host, HostListener};
use serde_json::{json, Value};
use std::cell::Cell;
use std::rc::Rc;
use uevent::{Event, EventEmitter, HandleEvent, Listener};

#[cfg(test)]
mod tests {
    use super::*;

    /// Handler object counting `test` events whose first argument is "foo"
    struct FooCounter {
        done: Cell<u32>,
    }

    impl HandleEvent<Host, Value> for FooCounter {
        fn handle_event(&self, event: &Event<'_, Host, Value>) -> uevent::Result<Option<Value>> {
            if event.event_type() == "test" && event.args().first() == Some(&json!("foo")) {
                self.done.set(self.done.get() + 1);
            }
            Ok(None)
        }
    }

    /// Handler object doubling the value of a `change` pipeline
    struct Doubler;

    impl HandleEvent<Host, Value> for Doubler {
        fn handle_event(&self, event: &Event<'_, Host, Value>) -> uevent::Result<Option<Value>> {
            Ok(event.value().and_then(|v| v.as_i64()).map(|v| json!(v * 2)))
        }
    }

    fn stopping(hits: &Hits) -> HostListener {
        let hits = hits.clone();
        HostListener::callback(move |event, _| {
            hits.bump();
            event.stop_propagation();
            Ok(None)
        })
    }

    #[test]
    fn test_stop_propagation_in_trigger() {
        let host = Host::new();
        let hits = Hits::new();
        host.on("test", stopping(&hits));
        host.on_map(vec![("test", hits.listener())]);

        let event = host.trigger("test", vec![]).unwrap();

        assert_eq!(hits.get(), 1);
        assert!(event.is_propagation_stopped());
    }

    #[test]
    fn test_stop_propagation_in_once_sweeps_unreached() {
        let host = Host::new();
        let hits = Hits::new();
        host.once("test", stopping(&hits));
        host.once_map(vec![("test", hits.listener())]);

        host.trigger("test", vec![]).unwrap();
        host.trigger("test", vec![]).unwrap();

        assert_eq!(hits.get(), 1);
        assert_eq!(host.events().listener_count("test"), 0);
    }

    #[test]
    fn test_stop_propagation_in_change() {
        let host = Host::new();
        let first = HostListener::callback(|event, args| {
            event.stop_propagation();
            Ok(args[0].as_i64().map(|v| json!(v + 1)))
        });
        host.on("test", first);
        host.on_map(vec![("test", add_one())]);

        let value = host.change("test", json!(0), vec![]).unwrap();

        assert_eq!(value, json!(1));
    }

    #[test]
    fn test_prevent_default_is_visible_to_caller() {
        let host = Host::new();
        let listener = HostListener::callback(|event, _| {
            event.prevent_default();
            Ok(None)
        });
        let hits = Hits::new();
        host.on("test", listener).on("test", hits.listener());

        let event = host.trigger("test", vec![]).unwrap();

        assert!(event.is_default_prevented());
        // preventing default does not stop propagation
        assert!(!event.is_propagation_stopped());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_handler_object_receives_args() {
        let host = Host::new();
        let counter = Rc::new(FooCounter { done: Cell::new(0) });
        host.on("test", Listener::handler(counter.clone()));

        host.trigger("test", vec![json!("foo")]).unwrap();
        host.trigger("test", vec![json!("bar")]).unwrap();

        assert_eq!(counter.done.get(), 1);
    }

    #[test]
    fn test_handler_object_in_change_pipeline() {
        let host = Host::new();
        host.on("test", add_one())
            .on("test", Listener::handler(Rc::new(Doubler)))
            .on("test", add_one());

        assert_eq!(host.change("test", json!(1), vec![]).unwrap(), json!(5));
    }

    #[test]
    fn test_listener_added_during_trigger_waits_for_next_dispatch() {
        let host = Host::new();
        let late_hits = Hits::new();
        let late = late_hits.listener::<Host, Value>();
        let adder = HostListener::callback(move |event, _| {
            event.target().on("test", late.clone());
            Ok(None)
        });
        host.on("test", adder);

        host.trigger("test", vec![]).unwrap();
        assert_eq!(late_hits.get(), 0);
        assert_eq!(host.events().listener_count("test"), 2);

        host.trigger("test", vec![]).unwrap();
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn test_listener_removed_during_trigger_still_runs_once() {
        let host = Host::new();
        let hits = Hits::new();
        let victim = hits.listener::<Host, Value>();
        let victim_clone = victim.clone();
        let remover = HostListener::callback(move |event, _| {
            event.target().off("test", Some(&victim_clone));
            Ok(None)
        });
        host.on("test", remover).on("test", victim);

        host.trigger("test", vec![]).unwrap();
        host.trigger("test", vec![]).unwrap();

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_once_listener_fires_once_under_nested_trigger() {
        let host = Host::new();
        let hits = Hits::new();
        let nested = Rc::new(Cell::new(false));
        let nested_clone = nested.clone();
        let reentrant = HostListener::callback(move |event, _| {
            if !nested_clone.replace(true) {
                event.target().trigger("test", vec![])?;
            }
            Ok(None)
        });
        host.on("test", reentrant);
        host.once("test", hits.listener());

        host.trigger("test", vec![]).unwrap();

        assert!(nested.get());
        assert_eq!(hits.get(), 1);
        assert_eq!(host.events().listener_count("test"), 1);
    }

    #[test]
    fn test_once_listener_added_during_trigger_is_swept() {
        let host = Host::new();
        let late_hits = Hits::new();
        let late = late_hits.listener::<Host, Value>();
        let adder = HostListener::callback(move |event, _| {
            event.target().once("test", late.clone());
            Ok(None)
        });
        host.on("test", adder);

        host.trigger("test", vec![]).unwrap();
        assert_eq!(host.events().listener_count("test"), 1);

        host.trigger("test", vec![]).unwrap();
        assert_eq!(late_hits.get(), 0);
        assert_eq!(host.events().listener_count("test"), 1);
    }

    #[test]
    fn test_nested_trigger_completes_before_outer_continues() {
        let host = Host::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));

        let order_outer = order.clone();
        let outer = HostListener::callback(move |event, _| {
            order_outer.borrow_mut().push("outer:start");
            event.target().trigger("inner", vec![])?;
            order_outer.borrow_mut().push("outer:end");
            Ok(None)
        });
        let order_inner = order.clone();
        let inner = HostListener::callback(move |_, _| {
            order_inner.borrow_mut().push("inner");
            Ok(None)
        });
        host.on("outer", outer).on("inner", inner);

        host.trigger("outer", vec![]).unwrap();

        assert_eq!(*order.borrow(), vec!["outer:start", "inner", "outer:end"]);
    }

    #[test]
    fn test_nested_change_on_other_event() {
        let host = Host::new();
        let outer = HostListener::callback(|event, args| {
            let inner = event.target().change("inner", args[0].clone(), vec![])?;
            Ok(Some(inner))
        });
        host.on("outer", outer).on("inner", add_one()).on("inner", add_one());

        assert_eq!(host.change("outer", json!(10), vec![]).unwrap(), json!(12));
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let host = Host::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let order = order.clone();
            let listener = HostListener::callback(move |_, _| {
                order.borrow_mut().push(tag);
                Ok(None)
            });
            host.on("test", listener);
        }

        host.trigger("test", vec![]).unwrap();

        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }
}
