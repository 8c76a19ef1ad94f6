fn main() {
    let a = 1;
    let b = 2;
    connect("localhost", 8080);
    log.infof("{}", a);
}

fn helper(n: usize) {
    run(|c| {
        c.update(n);
    });
}
