use std::cell::RefCell;
use std::rc::Rc;

use fileexplorer::{
    ActionError, ActionKind, ActionSink, Browser, HitTarget, MenuState, Node, NodeKind,
    NodePath, PointerEvent,
};

type Calls = Rc<RefCell<Vec<(ActionKind, String)>>>;

fn project() -> Node {
    Node::folder(
        "project",
        vec![
            Node::folder(
                "src",
                vec![
                    Node::folder("components", vec![Node::file("Button.tsx")]),
                    Node::file("index.ts"),
                ],
            ),
            Node::folder("styles", vec![Node::file("app.css")]),
            Node::file("readme.md"),
        ],
    )
}

struct RecordingSink(Calls);

impl ActionSink for RecordingSink {
    fn perform(&mut self, action: ActionKind, target: &str) -> Result<(), ActionError> {
        self.0.borrow_mut().push((action, target.to_string()));
        Ok(())
    }
}

fn recording_browser(root: Node) -> (Browser<RecordingSink>, Calls) {
    let calls: Calls = Rc::default();
    (Browser::new(root, RecordingSink(Rc::clone(&calls))), calls)
}

fn path(p: &str) -> NodePath {
    p.split('/').collect()
}

fn row(p: &str) -> HitTarget {
    HitTarget::Row(path(p))
}

fn left(browser: &mut Browser<RecordingSink>, target: &HitTarget) {
    browser.dispatch(target, &mut PointerEvent::primary(0.0, 0.0));
}

fn visible_names(browser: &Browser<RecordingSink>) -> Vec<String> {
    browser.rows().into_iter().map(|r| r.name).collect()
}

#[test]
fn selecting_twice_is_idempotent() {
    let (mut browser, _) = recording_browser(project());
    browser.right_click(&mut PointerEvent::secondary(10.0, 20.0), "index.ts");
    let menu_before = browser.context_menu().clone();

    browser.select("readme.md");
    let first = browser.selected().map(str::to_string);
    browser.select("readme.md");

    assert_eq!(browser.selected(), first.as_deref());
    assert_eq!(browser.context_menu(), &menu_before);
}

#[test]
fn toggling_one_folder_leaves_others_alone() {
    let (mut browser, _) = recording_browser(project());
    left(&mut browser, &row("project"));
    left(&mut browser, &row("project/styles"));
    left(&mut browser, &row("project/src"));
    left(&mut browser, &row("project/src/components"));

    // collapse and reopen src: styles is a sibling and must be untouched
    left(&mut browser, &row("project/src"));
    assert!(browser.is_expanded(&path("project/styles")));
    left(&mut browser, &row("project/src"));
    assert!(browser.is_expanded(&path("project/styles")));
    assert!(browser.is_expanded(&path("project")));
}

#[test]
fn collapse_hides_subtree_and_reopens_children_collapsed() {
    let (mut browser, _) = recording_browser(project());
    left(&mut browser, &row("project"));
    left(&mut browser, &row("project/src"));
    left(&mut browser, &row("project/src/components"));
    assert!(visible_names(&browser).contains(&"Button.tsx".to_string()));

    left(&mut browser, &row("project/src"));
    let collapsed = visible_names(&browser);
    assert_eq!(collapsed, vec!["project", "src", "styles", "readme.md"]);

    left(&mut browser, &row("project/src"));
    let rows = browser.rows();
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["project", "src", "components", "index.ts", "styles", "readme.md"]
    );
    let components = rows.iter().find(|r| r.name == "components").unwrap();
    assert_eq!(components.kind, NodeKind::Folder);
    assert!(!components.expanded);
}

#[test]
fn right_click_opens_menu_at_cursor() {
    let (mut browser, _) = recording_browser(project());
    let mut event = PointerEvent::secondary(150.0, 220.0);
    browser.dispatch(&row("project/src/index.ts"), &mut event);

    assert!(event.default_prevented());
    let menu = browser.context_menu();
    assert!(menu.visible);
    assert_eq!(menu.x, 150.0);
    assert_eq!(menu.y, 220.0);
    assert_eq!(menu.target.as_deref(), Some("index.ts"));
}

#[test]
fn left_click_selects_and_closes_menu_in_one_gesture() {
    let (mut browser, _) = recording_browser(project());
    browser.dispatch(&row("project/readme.md"), &mut PointerEvent::secondary(5.0, 5.0));
    assert!(browser.context_menu().visible);

    browser.dispatch(&row("project/styles/app.css"), &mut PointerEvent::primary(7.0, 9.0));

    assert_eq!(browser.selected(), Some("app.css"));
    assert!(!browser.context_menu().visible);
}

#[test]
fn action_consumes_target_then_closes() {
    let (mut browser, calls) = recording_browser(project());
    browser.right_click(&mut PointerEvent::secondary(1.0, 1.0), "readme.md");

    browser.dispatch(
        &HitTarget::MenuItem(ActionKind::Delete),
        &mut PointerEvent::primary(2.0, 2.0),
    );

    assert_eq!(
        calls.borrow().as_slice(),
        &[(ActionKind::Delete, "readme.md".to_string())]
    );
    assert_eq!(browser.context_menu().state(), MenuState::Closed);
}

#[test]
fn menu_click_without_target_calls_nothing() {
    let (mut browser, calls) = recording_browser(project());
    browser.invoke_action(ActionKind::Copy);
    assert_eq!(browser.context_menu().state(), MenuState::Closed);

    browser.dispatch(
        &HitTarget::MenuItem(ActionKind::Copy),
        &mut PointerEvent::primary(2.0, 2.0),
    );
    assert!(calls.borrow().is_empty());
    assert!(browser.drain_notifications().is_empty());
    assert_eq!(browser.context_menu().state(), MenuState::Closed);
    assert_eq!(browser.context_menu().target, None);
}

#[test]
fn names_with_path_syntax_are_plain_rows() {
    let tree = Node::folder(
        "root",
        vec![Node::file("a/b.txt"), Node::folder(".", vec![Node::file("x")])],
    );
    let (mut browser, _) = recording_browser(tree);
    let root = NodePath::root("root");
    left(&mut browser, &HitTarget::Row(root.clone()));

    left(&mut browser, &HitTarget::Row(root.join("a/b.txt")));
    assert_eq!(browser.selected(), Some("a/b.txt"));

    left(&mut browser, &HitTarget::Row(root.join(".")));
    assert!(browser.is_expanded(&root));
    assert_eq!(visible_names(&browser), vec!["root", "a/b.txt", ".", "x"]);
}

#[test]
fn duplicate_file_names_share_selection() {
    // Known limitation: files are identified by name alone.
    let tree = Node::folder(
        "root",
        vec![
            Node::folder("one", vec![Node::file("a.txt")]),
            Node::folder("two", vec![Node::file("a.txt")]),
        ],
    );
    assert_eq!(tree.duplicate_file_names(), vec!["a.txt".to_string()]);

    let (mut browser, _) = recording_browser(tree);
    left(&mut browser, &row("root"));
    left(&mut browser, &row("root/one"));
    left(&mut browser, &row("root/two"));
    left(&mut browser, &row("root/one/a.txt"));

    let selected: Vec<_> = browser
        .rows()
        .into_iter()
        .filter(|r| r.selected)
        .map(|r| r.path)
        .collect();
    assert_eq!(
        selected,
        vec![path("root/one/a.txt"), path("root/two/a.txt")]
    );
}
