//! Procedures defined in the language itself,
//! evaluated in order whenever a VM starts with `Config::prelude` set.

pub const PRELUDE: &[&str] = &[
    "(define 1+ (lambda (n) (+ n 1)))",
    "(define 1- (lambda (n) (- n 1)))",
    "(define zero? (lambda (n) (= n 0)))",
    "(define even? (lambda (n) (= (modulo n 2) 0)))",
    "(define odd? (lambda (n) (not (even? n))))",
    "(define <= (lambda (a b) (not (> a b))))",
    "(define >= (lambda (a b) (not (< a b))))",
    "(define abs (lambda (n) (if (< n 0) (- n) n)))",
    "(define map
       (lambda (f xs)
         (if (null? xs)
             '()
             (cons (f (car xs)) (map f (cdr xs))))))",
    "(define filter
       (lambda (keep? xs)
         (if (null? xs)
             '()
             (if (keep? (car xs))
                 (cons (car xs) (filter keep? (cdr xs)))
                 (filter keep? (cdr xs))))))",
    "(define fold
       (lambda (f acc xs)
         (if (null? xs)
             acc
             (fold f (f acc (car xs)) (cdr xs)))))",
    "(define append
       (lambda (xs ys)
         (if (null? xs)
             ys
             (cons (car xs) (append (cdr xs) ys)))))",
    "(define reverse (lambda (xs) (fold (lambda (acc x) (cons x acc)) '() xs)))",
    "(define compose (lambda (f g) (lambda (x) (f (g x)))))",
];
