use crate::support::{connected_queue, text, Recorder};

#[test]
fn two_members_alternate() {
    let mq = connected_queue();
    let first = Recorder::new();
    let second = Recorder::new();
    mq.queue_subscribe("test", "group-a", first.handler()).unwrap();
    mq.queue_subscribe("test", "group-a", second.handler()).unwrap();

    for n in 1..=4 {
        mq.publish(text("test", n.to_string())).unwrap();
    }
    mq.close();

    assert_eq!(first.bodies(), vec!["1", "3"]);
    assert_eq!(second.bodies(), vec!["2", "4"]);
}

#[test]
fn groups_on_other_topics_keep_their_own_rotation() {
    let mq = connected_queue();
    let a = Recorder::new();
    let b = Recorder::new();
    mq.queue_subscribe("test", "a", a.handler()).unwrap();
    mq.queue_subscribe("test", "a", b.handler()).unwrap();
    mq.queue_subscribe("apple", "a", b.handler()).unwrap();

    mq.publish(text("test", "1")).unwrap(); // a
    mq.publish(text("test", "2")).unwrap(); // b
    mq.publish(text("test", "3")).unwrap(); // a
    mq.publish(text("apple", "4")).unwrap(); // b
    mq.unsubscribe("test");
    mq.publish(text("test", "5")).unwrap(); // nobody
    mq.publish(text("apple", "6")).unwrap(); // b
    mq.close();

    assert_eq!(a.bodies(), vec!["1", "3"]);
    assert_eq!(b.bodies(), vec!["2", "4", "6"]);
}

#[test]
fn load_is_spread_evenly_in_round_robin_order() {
    let mq = connected_queue();
    let members: Vec<Recorder> = (0..3).map(|_| Recorder::new()).collect();
    for member in &members {
        mq.queue_subscribe("jobs", "workers", member.handler())
            .unwrap();
    }

    let total = 10;
    for n in 0..total {
        mq.publish(text("jobs", n.to_string())).unwrap();
    }
    mq.close();

    let floor = total / members.len();
    let ceil = floor + 1;
    for (index, member) in members.iter().enumerate() {
        let bodies = member.bodies();
        assert!(bodies.len() == floor || bodies.len() == ceil);
        let expected: Vec<String> = (index..total)
            .step_by(members.len())
            .map(|n| n.to_string())
            .collect();
        assert_eq!(bodies, expected);
    }
}

#[test]
fn each_group_and_every_direct_subscriber_get_the_message() {
    let mq = connected_queue();
    let direct = Recorder::new();
    let workers: Vec<Recorder> = (0..2).map(|_| Recorder::new()).collect();
    let auditor = Recorder::new();
    mq.subscribe("orders", direct.handler()).unwrap();
    for worker in &workers {
        mq.queue_subscribe("orders", "workers", worker.handler())
            .unwrap();
    }
    mq.queue_subscribe("orders", "auditors", auditor.handler())
        .unwrap();

    for n in 0..4 {
        mq.publish(text("orders", n.to_string())).unwrap();
    }
    mq.close();

    assert_eq!(direct.len(), 4);
    assert_eq!(auditor.len(), 4);
    assert_eq!(workers[0].bodies(), vec!["0", "2"]);
    assert_eq!(workers[1].bodies(), vec!["1", "3"]);
}

#[test]
fn late_member_joins_the_rotation() {
    let mq = connected_queue();
    let first = Recorder::new();
    let second = Recorder::new();
    mq.queue_subscribe("jobs", "workers", first.handler())
        .unwrap();

    mq.publish(text("jobs", "1")).unwrap();
    // Drains the queue, so the next member joins between messages.
    mq.unsubscribe("unrelated");
    mq.queue_subscribe("jobs", "workers", second.handler())
        .unwrap();
    mq.publish(text("jobs", "2")).unwrap();
    mq.publish(text("jobs", "3")).unwrap();
    mq.close();

    assert_eq!(first.bodies(), vec!["1", "3"]);
    assert_eq!(second.bodies(), vec!["2"]);
}

#[test]
fn resubscribing_after_unsubscribe_starts_a_fresh_group() {
    let mq = connected_queue();
    let old = Recorder::new();
    let fresh = Recorder::new();
    mq.queue_subscribe("jobs", "workers", old.handler()).unwrap();
    mq.publish(text("jobs", "1")).unwrap();

    mq.unsubscribe("jobs");
    mq.queue_subscribe("jobs", "workers", fresh.handler())
        .unwrap();
    mq.publish(text("jobs", "2")).unwrap();
    mq.close();

    assert_eq!(old.bodies(), vec!["1"]);
    assert_eq!(fresh.bodies(), vec!["2"]);
}
